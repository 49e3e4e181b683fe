//! Order-Harvest: a batched document harvester
//!
//! This crate fetches listing and document pages in bounded concurrent waves,
//! cuts the interesting region out of each document, and hands the result to
//! a structured-extraction service and a document store.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod ingest;
pub mod links;
pub mod monitor;
pub mod output;
pub mod storage;
pub mod summary;

use thiserror::Error;

/// Main error type for Order-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Summarizer error: {0}")]
    Summary(#[from] summary::SummaryError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

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
}

/// Result type alias for Order-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{BatchReport, BatchScheduler, FetchOutcome, Harvester};
pub use extract::{extract_bounded_region, split_into_sections, ContentSection};
pub use links::{document_slug, filter_links, PageLink};
pub use monitor::{MemorySample, ResourceMonitor};
