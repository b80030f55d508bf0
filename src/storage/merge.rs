//! Merging a freshly scraped batch into the persisted dataset

use crate::storage::ListingRecord;
use std::collections::HashSet;

/// Merges the previously persisted records with a freshly scraped batch.
///
/// Concatenates `previous ++ fresh` and deduplicates on `detail_link`,
/// keeping the first occurrence. Previously persisted records therefore win
/// over fresh duplicates of the same link: the stored copy may have been
/// manually curated, and a record's non-key fields are never updated in
/// place by a later scrape. First-seen order is preserved.
///
/// The operation is idempotent: merging the same batch twice adds nothing.
pub fn merge(previous: Vec<ListingRecord>, fresh: Vec<ListingRecord>) -> Vec<ListingRecord> {
    let mut seen: HashSet<String> = HashSet::new();
    previous
        .into_iter()
        .chain(fresh)
        .filter(|record| seen.insert(record.detail_link.clone()))
        .collect()
}
