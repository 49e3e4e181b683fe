//! Storage module for persisting harvested documents
//!
//! This module handles all database operations for the harvester, including:
//! - SQLite database initialization and schema management
//! - Run tracking keyed by configuration hash
//! - Document records and their named artifacts

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{DocumentStore, StorageError, StorageResult};

use crate::HarvestError;
use chrono::NaiveDate;
use std::path::Path;

/// Opens (or creates) the document database
pub fn open_store(path: &Path) -> Result<SqliteStore, HarvestError> {
    Ok(SqliteStore::new(path)?)
}

/// Represents a harvest run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
}

/// Status of a harvest run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Fields supplied when creating a document record
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    pub title: String,
    pub original_document_url: String,
    pub short_summary: String,
    pub date_signed: NaiveDate,
    pub signer: String,
    pub order_number: Option<i64>,
}

/// A stored document
#[derive(Debug, Clone)]
pub struct DocumentRecord {
    pub id: i64,
    pub title: String,
    pub original_document_url: String,
    pub short_summary: String,
    pub date_signed: NaiveDate,
    pub signer: String,
    pub order_number: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

/// A named narrative artifact attached to a document
#[derive(Debug, Clone)]
pub struct ArtifactRecord {
    pub id: i64,
    pub document_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: String,
}
