//! Storage traits and error types

use crate::storage::{ArtifactRecord, DocumentRecord, NewDocument, RunRecord};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Document not found: {0}")]
    DocumentNotFound(i64),

    #[error("Artifact '{0}' has no content")]
    EmptyArtifact(String),

    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence of runs, documents and their artifacts
///
/// Writes take `&mut self`; a store is owned by one driver at a time.
pub trait DocumentStore {
    // ===== Run Management =====

    /// Creates a new run and returns its ID
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Marks a run as completed with a finish timestamp
    fn complete_run(&mut self, run_id: i64) -> StorageResult<()>;

    /// Marks a run as failed with a finish timestamp
    fn fail_run(&mut self, run_id: i64) -> StorageResult<()>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    // ===== Documents =====

    /// Inserts a document and returns its ID
    fn create_document(&mut self, document: &NewDocument) -> StorageResult<i64>;

    /// Inserts a named artifact for a document
    ///
    /// Content that is empty after trimming is rejected with
    /// `StorageError::EmptyArtifact`.
    fn create_artifact(&mut self, document_id: i64, title: &str, content: &str)
        -> StorageResult<i64>;

    /// Most recently created document with the given source link
    fn get_document_by_url(&self, url: &str) -> StorageResult<Option<DocumentRecord>>;

    /// Artifacts of a document in insertion order
    fn get_artifacts(&self, document_id: i64) -> StorageResult<Vec<ArtifactRecord>>;

    // ===== Statistics =====

    fn count_documents(&self) -> StorageResult<u64>;

    fn count_artifacts(&self) -> StorageResult<u64>;

    /// Artifact counts grouped by title, sorted by title
    fn count_artifacts_by_title(&self) -> StorageResult<Vec<(String, u64)>>;
}
