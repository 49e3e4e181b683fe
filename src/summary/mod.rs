//! Structured-extraction collaborator
//!
//! A harvested document is sent to an external service that returns a
//! fixed-shape JSON record. The record's report is split into sections and
//! the five narrative sections become the document's artifacts.

mod artifacts;
mod http;
mod record;

pub use artifacts::{SectionArtifacts, SECTION_TITLES};
pub use http::{build_prompt, HttpSummarizer};
pub use record::{parse_signing_date, DocumentSummary};

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by the summarizer
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Summarizer request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Summarizer returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed summarizer response: {0}")]
    Parse(String),

    #[error("API key environment variable {0} is not set")]
    MissingApiKey(String),
}

/// Turns full document text into a structured record
///
/// Constructed once and shared read-only by every ingest.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, document_text: &str) -> Result<DocumentSummary, SummaryError>;
}
