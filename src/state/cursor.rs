//! Durable resume position for the segment-by-segment traversal

use serde::{Deserialize, Serialize};
use std::fmt;

/// The durable resume point of the crawl.
///
/// A cursor always points at the *next* unit of work to attempt, never at a
/// completed one. Within a run it only moves forward; only an explicit fresh
/// start resets it.
///
/// Pages are numbered from 1 to match the site's pagination parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Index into the configured segment (city) list
    pub segment_index: u32,

    /// Page number within the segment, 1-based
    pub page: u32,
}

impl Cursor {
    /// Creates a cursor at the given position
    pub fn new(segment_index: u32, page: u32) -> Self {
        Self { segment_index, page }
    }

    /// The starting cursor: first segment, first page
    pub fn start() -> Self {
        Self::new(0, 1)
    }

    /// Cursor for the next page of the same segment
    pub fn next_page(&self) -> Self {
        Self::new(self.segment_index, self.page + 1)
    }

    /// Cursor for the first page of the next segment
    ///
    /// Used both for the page-budget rollover and for the exhaustion skip
    /// (a page with zero fragments ends its whole segment).
    pub fn next_segment(&self) -> Self {
        Self::new(self.segment_index + 1, 1)
    }

    /// Returns true if this cursor lies past the end of a segment list of
    /// the given length, i.e. there is no work left.
    pub fn is_past_end(&self, segment_count: usize) -> bool {
        self.segment_index as usize >= segment_count
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "segment {} page {}", self.segment_index, self.page)
    }
}
