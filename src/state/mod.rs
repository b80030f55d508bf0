//! State module for tracking crawl progress
//!
//! This module provides the two layers of crawl state:
//!
//! - `Cursor`: the durable resume position (segment index, page number)
//! - `RunState`: the transient per-run accumulator (records, counter, cap)
//! - `RunOutcome`: why a run stopped

mod cursor;
mod run_state;

// Re-export main types
pub use cursor::Cursor;
pub use run_state::{RunOutcome, RunState};
