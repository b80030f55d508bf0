//! Configuration module for Immo-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. The crawler treats its configuration as fixed input: the segment
//! list, page budget, per-run cap, request delay, selectors and file paths
//! are all supplied here and never mutated.

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, SelectorConfig, SiteConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
