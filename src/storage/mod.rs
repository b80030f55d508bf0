//! Storage module for the two durable files the crawler owns
//!
//! This module handles all persistence for the crawler:
//! - The checkpoint file: a tiny JSON cursor recording where to resume
//! - The dataset file: the deduplicated CSV of every listing harvested
//! - The merge algorithm that folds a fresh batch into the existing dataset
//!
//! Both files are only ever written by the single orchestrator thread, and
//! both are replaced atomically (write to a temp file, then rename).

mod checkpoint;
mod dataset;
mod merge;

pub use checkpoint::{CheckpointError, CheckpointStore};
pub use dataset::{DatasetError, DatasetStore, CSV_HEADERS};
pub use merge::merge;

/// One harvested listing.
///
/// `detail_link` is the natural key: two records with the same link denote
/// the same real-world listing. Every other field may be empty; listings
/// routinely omit a price or a description, and that is data, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRecord {
    /// City slug the listing was found under
    pub segment: String,

    /// Listing title as displayed on the summary page
    pub title: String,

    /// Absolute link to the listing's detail page (natural key)
    pub detail_link: String,

    /// Short description from the summary page
    pub description: String,

    /// Price exactly as displayed; numeric parsing is the ETL's job
    pub price_text: String,

    /// Location string harvested from the detail page
    pub location_text: String,

    /// Auxiliary details (rooms, surface, options) in display order
    pub detail_fields: Vec<String>,
}
