//! Crawler module for page fetching and harvest orchestration
//!
//! This module contains the core harvesting logic, including:
//! - Isolated per-session HTTP fetching
//! - HTML parsing, link extraction and markdown rendering
//! - Bounded wave scheduling with memory checkpoints
//! - Listing → document harvest coordination

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{
    run_harvest, DocumentVerdict, HarvestSummary, HarvestedDocument, Harvester,
};
pub use fetcher::{
    build_http_client, fetch_url, FailureKind, FetchFailure, FetchOutcome, FetchSettings,
    FetchTarget, FetchedPage, Fetcher, HttpFetcher, SessionId,
};
pub use parser::{parse_html, ParsedPage};
pub use scheduler::{BatchReport, BatchScheduler, WaveStats};
