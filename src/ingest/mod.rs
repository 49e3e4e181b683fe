//! Ingest of harvested documents into the document store
//!
//! Each harvested document is summarized, checked for the metadata a stored
//! document requires, saved, and its report sections become artifacts.
//! Failures are isolated to the document they occur on.

use crate::crawler::HarvestedDocument;
use crate::storage::{DocumentStore, NewDocument};
use crate::summary::{DocumentSummary, SectionArtifacts, Summarizer};
use crate::HarvestError;
use std::path::Path;
use std::sync::Arc;

/// Counters of one ingest pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub summarized: usize,
    pub summary_failures: usize,
    pub skipped_missing_metadata: usize,
    pub documents_created: usize,
    pub artifacts_created: usize,
    pub store_failures: usize,
}

impl IngestReport {
    /// Documents that did not end up stored
    pub fn skipped(&self) -> usize {
        self.summary_failures + self.skipped_missing_metadata
    }

    pub fn has_failures(&self) -> bool {
        self.summary_failures > 0 || self.skipped_missing_metadata > 0 || self.store_failures > 0
    }
}

/// Why a summary cannot become a document record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingMetadata {
    Title,
    DocLink,
    Signer,
    DateSigned,
}

impl std::fmt::Display for MissingMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let field = match self {
            Self::Title => "title",
            Self::DocLink => "document link",
            Self::Signer => "signer",
            Self::DateSigned => "signing date",
        };
        write!(f, "missing {}", field)
    }
}

/// Builds the document record from a summary
///
/// Title, link and signer must be non-blank and the signing date must parse.
pub fn document_from_summary(summary: &DocumentSummary) -> Result<NewDocument, MissingMetadata> {
    if summary.title.trim().is_empty() {
        return Err(MissingMetadata::Title);
    }
    if summary.doc_link.trim().is_empty() {
        return Err(MissingMetadata::DocLink);
    }
    if summary.signer.trim().is_empty() {
        return Err(MissingMetadata::Signer);
    }
    let date_signed = summary.signing_date().ok_or(MissingMetadata::DateSigned)?;

    Ok(NewDocument {
        title: summary.title.trim().to_string(),
        original_document_url: summary.doc_link.trim().to_string(),
        short_summary: summary.description.trim().to_string(),
        date_signed,
        signer: summary.signer.trim().to_string(),
        order_number: summary.order_number(),
    })
}

/// Loads previously harvested documents from the articles directory
///
/// Every `*.md` file becomes one document: the slug is the file stem and the
/// content is the file text. Files are returned sorted by name. Blank files
/// are skipped. The source address is not known and is left empty.
pub async fn load_articles(dir: &Path) -> Result<Vec<HarvestedDocument>, HarvestError> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut paths = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_markdown = path.extension().and_then(|e| e.to_str()) == Some("md");
        if is_markdown && entry.file_type().await?.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let content = tokio::fs::read_to_string(&path).await?;
        if content.trim().is_empty() {
            tracing::warn!("{} is empty, skipping", path.display());
            continue;
        }

        let slug = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        documents.push(HarvestedDocument {
            source_url: String::new(),
            slug,
            link_text: String::new(),
            content,
            path,
        });
    }

    tracing::info!("Loaded {} articles from {}", documents.len(), dir.display());
    Ok(documents)
}

/// Drives summarization and persistence for harvested documents
pub struct Ingestor {
    summarizer: Arc<dyn Summarizer>,
}

impl Ingestor {
    pub fn new(summarizer: Arc<dyn Summarizer>) -> Self {
        Self { summarizer }
    }

    /// Ingests every document, one at a time
    ///
    /// Nothing is retried. Artifacts already created for a document are kept
    /// when a later artifact of the same document fails.
    pub async fn ingest<S: DocumentStore + ?Sized>(
        &self,
        store: &mut S,
        documents: &[HarvestedDocument],
    ) -> IngestReport {
        let mut report = IngestReport::default();

        for document in documents {
            self.ingest_one(store, document, &mut report).await;
        }

        tracing::info!(
            "Ingest finished: {} documents, {} artifacts, {} skipped",
            report.documents_created,
            report.artifacts_created,
            report.skipped()
        );
        report
    }

    async fn ingest_one<S: DocumentStore + ?Sized>(
        &self,
        store: &mut S,
        document: &HarvestedDocument,
        report: &mut IngestReport,
    ) {
        let summary = match self.summarizer.summarize(&document.content).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!("Summarizing {} failed: {}", document.label(), e);
                report.summary_failures += 1;
                return;
            }
        };
        report.summarized += 1;

        let new_document = match document_from_summary(&summary) {
            Ok(doc) => doc,
            Err(missing) => {
                tracing::warn!("Skipping {}: {}", document.label(), missing);
                report.skipped_missing_metadata += 1;
                return;
            }
        };

        let document_id = match store.create_document(&new_document) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Storing {} failed: {}", document.label(), e);
                report.store_failures += 1;
                return;
            }
        };
        report.documents_created += 1;
        tracing::debug!("Stored '{}' as document {}", new_document.title, document_id);

        let artifacts = SectionArtifacts::from_report(&summary.report);
        for (title, content) in artifacts.non_empty() {
            match store.create_artifact(document_id, title, content) {
                Ok(_) => report.artifacts_created += 1,
                Err(e) => {
                    tracing::warn!(
                        "Storing artifact '{}' of document {} failed: {}",
                        title,
                        document_id,
                        e
                    );
                    report.store_failures += 1;
                }
            }
        }
    }
}
