//! Crawl orchestrator - the segment-by-segment state machine
//!
//! This module drives the whole run:
//! - resuming from the persisted cursor (or a fresh start)
//! - fetching each segment's index pages in order
//! - running every body through the block detector
//! - extracting fragments and enriching each one from its detail page
//! - committing the checkpoint after every page advance and on every halt
//! - merging the run's haul into the persisted dataset at the end
//!
//! Execution is strictly sequential: one fetch in flight at a time, with the
//! fetcher's fixed delay between requests. The per-run record cap lets a
//! long crawl be split safely across many short runs.

use crate::config::Config;
use crate::crawler::detector::{classify, Classification};
use crate::crawler::enricher::LocationChain;
use crate::crawler::extractor::{extract_fragments, listing_page_url, ListingSelectors};
use crate::crawler::fetcher::{build_http_client, Fetcher};
use crate::state::{Cursor, RunOutcome, RunState};
use crate::storage::{merge, CheckpointStore, DatasetStore, ListingRecord};
use crate::{ImmoError, Result};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Summary of a finished run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Why the run stopped
    pub outcome: RunOutcome,

    /// Listings fetched this run (including any discarded with a halted page)
    pub records_fetched: u32,

    /// Records contributed by this run's completed pages
    pub run_records: usize,

    /// Records newly added to the dataset by the merge
    pub new_records: usize,

    /// Total dataset size after the merge
    pub dataset_size: usize,

    /// The persisted cursor at run end
    pub cursor: Cursor,
}

/// What happened to one index page
enum PageOutcome {
    /// Every fragment processed; page's records ready to commit
    Complete(Vec<ListingRecord>),

    /// Zero fragments: the segment is exhausted at this depth
    Empty,

    /// Listing fetch failed; skip the page and move on
    Skipped,

    /// Run-halting condition (cap reached or block detected); the cursor
    /// must not advance past this page
    Halted(RunOutcome),
}

/// Main crawl orchestrator structure
pub struct Orchestrator {
    config: Arc<Config>,
    fetcher: Fetcher,
    selectors: ListingSelectors,
    locations: LocationChain,
    site_base: Url,
    checkpoints: CheckpointStore,
    dataset: DatasetStore,
    start_cursor: Cursor,
}

impl Orchestrator {
    /// Creates a new orchestrator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The validated crawler configuration
    /// * `fresh` - Whether to ignore the checkpoint and start at the top
    pub fn new(config: Config, fresh: bool) -> Result<Self> {
        let client = build_http_client(&config.site)?;
        let fetcher = Fetcher::new(
            client,
            Duration::from_millis(config.crawler.request_delay_ms),
        );

        let selectors = ListingSelectors::compile(&config.selectors).map_err(ImmoError::Config)?;
        let locations = LocationChain::compile(&config.selectors).map_err(ImmoError::Config)?;
        let site_base = Url::parse(&config.site.base_url)?;

        let checkpoints = CheckpointStore::new(&config.output.checkpoint_path);
        let dataset = DatasetStore::new(&config.output.dataset_path);

        let start_cursor = if fresh {
            tracing::info!("Fresh start requested, ignoring any checkpoint");
            Cursor::start()
        } else {
            let cursor = checkpoints.load()?;
            if cursor != Cursor::start() {
                tracing::info!("Resuming from checkpoint: {}", cursor);
            }
            cursor
        };

        Ok(Self {
            config: Arc::new(config),
            fetcher,
            selectors,
            locations,
            site_base,
            checkpoints,
            dataset,
            start_cursor,
        })
    }

    /// Runs the crawl to one of its terminal states and persists the merge.
    ///
    /// Transition precedence at each unit of work:
    /// 1. per-run cap reached -> halt, cursor not advanced
    /// 2. block page detected -> halt, cursor not advanced
    /// 3. empty page -> skip to the next segment's first page
    /// 4. page processed -> advance to the next page
    /// 5. past the last segment -> terminal
    pub async fn run(&mut self) -> Result<RunReport> {
        let segment_count = self.config.crawler.segments.len();
        let pages_per_segment = self.config.crawler.pages_per_segment;

        let mut cursor = self.start_cursor;
        let mut state = RunState::new(self.config.crawler.max_records_per_run);
        let mut halted: Option<RunOutcome> = None;
        let mut ended_by_exhaustion = false;

        tracing::info!(
            "Starting run at {} ({} segments, {} pages each, cap {})",
            cursor,
            segment_count,
            pages_per_segment,
            self.config.crawler.max_records_per_run
        );

        'segments: while !cursor.is_past_end(segment_count) {
            let segment = self.config.crawler.segments[cursor.segment_index as usize].clone();

            while cursor.page <= pages_per_segment {
                match self.process_page(&segment, cursor, &mut state).await {
                    PageOutcome::Complete(page_records) => {
                        tracing::info!(
                            "Segment '{}' page {}: {} records",
                            segment,
                            cursor.page,
                            page_records.len()
                        );
                        state.commit_page(page_records);
                        cursor = cursor.next_page();
                        self.checkpoints.save(&cursor)?;
                    }

                    PageOutcome::Empty => {
                        tracing::info!(
                            "Segment '{}' exhausted at page {}, moving to next segment",
                            segment,
                            cursor.page
                        );
                        cursor = cursor.next_segment();
                        self.checkpoints.save(&cursor)?;
                        if cursor.is_past_end(segment_count) {
                            ended_by_exhaustion = true;
                        }
                        continue 'segments;
                    }

                    PageOutcome::Skipped => {
                        cursor = cursor.next_page();
                        self.checkpoints.save(&cursor)?;
                    }

                    PageOutcome::Halted(reason) => {
                        halted = Some(reason);
                        break 'segments;
                    }
                }
            }

            // Page budget spent for this segment
            cursor = cursor.next_segment();
            self.checkpoints.save(&cursor)?;
        }

        // The cursor is flushed on every halt so no work is silently lost
        self.checkpoints.save(&cursor)?;

        let outcome = halted.unwrap_or(if ended_by_exhaustion {
            RunOutcome::Exhausted
        } else {
            RunOutcome::Done
        });

        let records_fetched = state.records_fetched();
        let run_records = state.record_count();
        let fresh = state.into_records();

        let previous = self.dataset.load()?;
        let previous_count = previous.len();
        let merged = merge(previous, fresh);
        self.dataset.save(&merged)?;

        let report = RunReport {
            outcome,
            records_fetched,
            run_records,
            new_records: merged.len() - previous_count,
            dataset_size: merged.len(),
            cursor,
        };

        tracing::info!(
            "Run halted ({}): {} fetched, {} new, dataset now {} records, cursor {}",
            report.outcome,
            report.records_fetched,
            report.new_records,
            report.dataset_size,
            report.cursor
        );

        Ok(report)
    }

    /// Processes one index page: fetch, detect, extract, enrich.
    ///
    /// Records from this page are buffered locally and only returned when
    /// the page completes; a page halted mid-loop contributes nothing and
    /// is retried wholesale on the next run.
    async fn process_page(
        &self,
        segment: &str,
        cursor: Cursor,
        state: &mut RunState,
    ) -> PageOutcome {
        if state.limit_reached() {
            tracing::info!("Per-run record cap reached at {}", cursor);
            return PageOutcome::Halted(RunOutcome::LimitReached);
        }

        let url = listing_page_url(&self.config.site.base_url, segment, cursor.page);
        tracing::debug!("Fetching index page {}", url);

        let body = match self.fetcher.fetch(&url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Skipping page after fetch failure: {}", e);
                return PageOutcome::Skipped;
            }
        };

        if classify(&body) == Classification::Blocked {
            tracing::warn!("Block page detected at {}", url);
            return PageOutcome::Halted(RunOutcome::Blocked);
        }

        let fragments = extract_fragments(&body, &self.selectors, &self.site_base);
        if fragments.is_empty() {
            return PageOutcome::Empty;
        }

        let mut page_records = Vec::with_capacity(fragments.len());
        for fragment in fragments {
            if state.limit_reached() {
                tracing::info!(
                    "Per-run record cap reached mid-page at {}; page will be retried",
                    cursor
                );
                return PageOutcome::Halted(RunOutcome::LimitReached);
            }

            let location_text = match self.fetcher.fetch(&fragment.detail_link).await {
                Ok(detail_body) => {
                    if classify(&detail_body) == Classification::Blocked {
                        tracing::warn!(
                            "Block page detected on detail page {}",
                            fragment.detail_link
                        );
                        return PageOutcome::Halted(RunOutcome::Blocked);
                    }
                    match self.locations.extract(&detail_body) {
                        Some(location) => location,
                        None => {
                            tracing::debug!("No location found for {}", fragment.detail_link);
                            String::new()
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Detail fetch failed, location left empty: {}", e);
                    String::new()
                }
            };

            state.count_fetched();
            page_records.push(ListingRecord {
                segment: segment.to_string(),
                title: fragment.title,
                detail_link: fragment.detail_link,
                description: fragment.description,
                price_text: fragment.price_text,
                location_text,
                detail_fields: fragment.detail_fields,
            });
        }

        PageOutcome::Complete(page_records)
    }
}

/// Runs the main crawl operation
///
/// # Arguments
///
/// * `config` - The validated crawler configuration
/// * `fresh` - Whether to ignore the checkpoint and start at the top
pub async fn run_crawl(config: Config, fresh: bool) -> Result<RunReport> {
    let mut orchestrator = Orchestrator::new(config, fresh)?;
    orchestrator.run().await
}
