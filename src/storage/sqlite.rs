//! SQLite storage implementation

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{DocumentStore, StorageError, StorageResult};
use crate::storage::{ArtifactRecord, DocumentRecord, NewDocument, RunRecord, RunStatus};
use chrono::{NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite document store
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens or creates the database at `path` and applies the schema
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![status.to_db_string(), now, run_id],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    let status: String = row.get(4)?;
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&status).unwrap_or(RunStatus::Failed),
    })
}

fn document_from_row(row: &Row<'_>) -> rusqlite::Result<DocumentRecord> {
    let date: String = row.get(4)?;
    let date_signed = NaiveDate::parse_from_str(&date, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

    Ok(DocumentRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        original_document_url: row.get(2)?,
        short_summary: row.get(3)?,
        date_signed,
        signer: row.get(5)?,
        order_number: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

impl DocumentStore for SqliteStore {
    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn complete_run(&mut self, run_id: i64) -> StorageResult<()> {
        self.finish_run(run_id, RunStatus::Completed)
    }

    fn fail_run(&mut self, run_id: i64) -> StorageResult<()> {
        self.finish_run(run_id, RunStatus::Failed)
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status
                 FROM runs ORDER BY id DESC LIMIT 1",
                [],
                run_from_row,
            )
            .optional()?;
        Ok(run)
    }

    // ===== Documents =====

    fn create_document(&mut self, document: &NewDocument) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO documents (title, original_document_url, short_summary, date_signed,
             signer, order_number, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            params![
                document.title,
                document.original_document_url,
                document.short_summary,
                document.date_signed.format(DATE_FORMAT).to_string(),
                document.signer,
                document.order_number,
                now,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn create_artifact(
        &mut self,
        document_id: i64,
        title: &str,
        content: &str,
    ) -> StorageResult<i64> {
        if content.trim().is_empty() {
            return Err(StorageError::EmptyArtifact(title.to_string()));
        }

        let exists: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM documents WHERE id = ?1",
                params![document_id],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_none() {
            return Err(StorageError::DocumentNotFound(document_id));
        }

        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO document_artifacts (document_id, title, content, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![document_id, title, content, now],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_document_by_url(&self, url: &str) -> StorageResult<Option<DocumentRecord>> {
        let document = self
            .conn
            .query_row(
                "SELECT id, title, original_document_url, short_summary, date_signed, signer,
                 order_number, created_at, updated_at
                 FROM documents WHERE original_document_url = ?1
                 ORDER BY id DESC LIMIT 1",
                params![url],
                document_from_row,
            )
            .optional()
            .map_err(|e| match e {
                rusqlite::Error::FromSqlConversionFailure(..) => {
                    StorageError::CorruptRow(e.to_string())
                }
                other => StorageError::Sqlite(other),
            })?;
        Ok(document)
    }

    fn get_artifacts(&self, document_id: i64) -> StorageResult<Vec<ArtifactRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, document_id, title, content, created_at
             FROM document_artifacts WHERE document_id = ?1 ORDER BY id",
        )?;

        let artifacts = stmt
            .query_map(params![document_id], |row| {
                Ok(ArtifactRecord {
                    id: row.get(0)?,
                    document_id: row.get(1)?,
                    title: row.get(2)?,
                    content: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(artifacts)
    }

    // ===== Statistics =====

    fn count_documents(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_artifacts(&self) -> StorageResult<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM document_artifacts", [], |row| {
                    row.get(0)
                })?;
        Ok(count as u64)
    }

    fn count_artifacts_by_title(&self) -> StorageResult<Vec<(String, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT title, COUNT(*) FROM document_artifacts GROUP BY title ORDER BY title",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut counts = Vec::new();
        for row in rows {
            let (title, count) = row?;
            counts.push((title, count as u64));
        }

        Ok(counts)
    }
}
