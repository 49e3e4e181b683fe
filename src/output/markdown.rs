//! Markdown harvest report
//!
//! A human-readable record of one harvest: counters, peak memory, every
//! fetch failure and the saved documents.

use crate::crawler::HarvestSummary;
use crate::output::format_mib;
use crate::HarvestError;
use std::path::Path;

/// Writes the markdown report to `output_path`
pub async fn write_harvest_report(
    summary: &HarvestSummary,
    output_path: &Path,
) -> Result<(), HarvestError> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(output_path, format_harvest_report(summary)).await?;
    Ok(())
}

/// Formats a harvest summary as markdown
pub fn format_harvest_report(summary: &HarvestSummary) -> String {
    let mut md = String::new();

    md.push_str("# Order-Harvest Report\n\n");

    md.push_str("## Overview\n\n");
    md.push_str(&format!(
        "- **Status**: {}\n",
        if summary.is_complete() {
            "complete"
        } else {
            "partial"
        }
    ));
    md.push_str(&format!(
        "- **Duration**: {:.1} seconds\n",
        summary.elapsed.as_secs_f64()
    ));
    md.push_str(&format!(
        "- **Peak Memory**: {}\n",
        format_mib(summary.peak_memory_bytes)
    ));
    md.push_str(&format!("- **Save Rate**: {:.2}%\n\n", summary.save_rate()));

    md.push_str("## Counts\n\n");
    md.push_str("| Stage | Count |\n");
    md.push_str("|-------|-------|\n");
    md.push_str(&format!(
        "| Listing pages fetched | {} |\n",
        summary.listing_pages_fetched
    ));
    md.push_str(&format!(
        "| Listing pages failed | {} |\n",
        summary.listing_pages_failed
    ));
    md.push_str(&format!("| Document links found | {} |\n", summary.links_found));
    md.push_str(&format!(
        "| Documents fetched | {} |\n",
        summary.documents_fetched
    ));
    md.push_str(&format!("| Documents failed | {} |\n", summary.documents_failed));
    md.push_str(&format!(
        "| Documents skipped | {} |\n",
        summary.documents_skipped
    ));
    md.push_str(&format!("| Documents saved | {} |\n", summary.documents_saved));
    md.push_str(&format!("| Write failures | {} |\n\n", summary.write_failures));

    if !summary.failures.is_empty() {
        md.push_str("## Fetch Failures\n\n");
        md.push_str("| URL | Cause |\n");
        md.push_str("|-----|-------|\n");
        for failure in &summary.failures {
            md.push_str(&format!("| {} | {} |\n", failure.url, failure.kind));
        }
        md.push('\n');
    }

    if !summary.documents.is_empty() {
        md.push_str("## Saved Documents\n\n");
        for doc in &summary.documents {
            let label = if doc.link_text.is_empty() {
                doc.slug.as_str()
            } else {
                doc.link_text.as_str()
            };
            md.push_str(&format!(
                "- [{}]({}) → `{}`\n",
                label,
                doc.source_url,
                doc.path.display()
            ));
        }
        md.push('\n');
    }

    md
}
