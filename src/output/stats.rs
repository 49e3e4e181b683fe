//! Statistics from the document store

use crate::storage::{DocumentStore, RunRecord};
use crate::HarvestError;

/// Document store statistics
#[derive(Debug, Clone, Default)]
pub struct HarvestStatistics {
    /// Most recent run, if any
    pub latest_run: Option<RunRecord>,

    /// Number of stored documents
    pub documents: u64,

    /// Number of stored artifacts
    pub artifacts: u64,

    /// Artifact counts by section title
    pub artifacts_by_title: Vec<(String, u64)>,
}

impl HarvestStatistics {
    /// Average artifacts per document
    pub fn artifacts_per_document(&self) -> f64 {
        if self.documents == 0 {
            return 0.0;
        }
        self.artifacts as f64 / self.documents as f64
    }
}

/// Loads statistics from storage
pub fn load_statistics<S: DocumentStore + ?Sized>(
    store: &S,
) -> Result<HarvestStatistics, HarvestError> {
    Ok(HarvestStatistics {
        latest_run: store.get_latest_run()?,
        documents: store.count_documents()?,
        artifacts: store.count_artifacts()?,
        artifacts_by_title: store.count_artifacts_by_title()?,
    })
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &HarvestStatistics) {
    println!("=== Harvest Statistics ===\n");

    match &stats.latest_run {
        Some(run) => {
            println!("Latest run:");
            println!("  ID: {}", run.id);
            println!("  Started: {}", run.started_at);
            if let Some(finished) = &run.finished_at {
                println!("  Finished: {}", finished);
            }
            println!("  Status: {}", run.status.to_db_string());
            println!("  Config hash: {}", run.config_hash);
        }
        None => println!("No runs recorded"),
    }
    println!();

    println!("Documents: {}", stats.documents);
    println!(
        "Artifacts: {} ({:.1} per document)",
        stats.artifacts,
        stats.artifacts_per_document()
    );

    if !stats.artifacts_by_title.is_empty() {
        println!();
        println!("Artifacts by section:");
        for (title, count) in &stats.artifacts_by_title {
            println!("  {}: {}", title, count);
        }
    }
}
