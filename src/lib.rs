//! Immo-Harvest: a resumable classifieds crawler
//!
//! This crate implements a checkpointed crawler that harvests real-estate
//! listing records from a paginated classifieds site, city by city, and
//! merges each run's haul idempotently into a persistent CSV dataset.

pub mod config;
pub mod crawler;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Immo-Harvest operations
#[derive(Debug, Error)]
pub enum ImmoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] storage::CheckpointError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] storage::DatasetError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// Result type alias for Immo-Harvest operations
pub type Result<T> = std::result::Result<T, ImmoError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{classify, Classification, FetchError, Fetcher, RunReport};
pub use state::{Cursor, RunOutcome, RunState};
pub use storage::{merge, ListingRecord};
