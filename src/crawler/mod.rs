//! Crawler module for page fetching and listing harvesting
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a fixed identity and enforced request delay
//! - Anti-bot block page detection
//! - Listing fragment extraction and detail page enrichment
//! - The segment-by-segment orchestration state machine

mod detector;
mod enricher;
mod extractor;
mod fetcher;
mod orchestrator;

pub use detector::{classify, Classification};
pub use enricher::LocationChain;
pub use extractor::{extract_fragments, listing_page_url, ListingSelectors, RawFragment};
pub use fetcher::{build_http_client, FetchError, Fetcher};
pub use orchestrator::{run_crawl, Orchestrator, RunReport};

use crate::config::Config;
use crate::Result;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a run. It will:
/// 1. Build the HTTP client and compile the selectors
/// 2. Load the checkpoint (or start fresh)
/// 3. Walk segments and pages from the cursor, enriching every listing
/// 4. Merge the haul into the persisted dataset
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `fresh` - Whether to ignore the checkpoint and start at the top
///
/// # Returns
///
/// * `Ok(RunReport)` - The run reached a terminal state cleanly
/// * `Err(ImmoError)` - Setup or persistence failed
pub async fn crawl(config: Config, fresh: bool) -> Result<RunReport> {
    run_crawl(config, fresh).await
}
