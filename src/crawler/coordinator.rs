//! Harvest coordinator - listing and document orchestration
//!
//! This module contains the main harvest loop, which:
//! - Fetches each listing page and keeps its internal links under the harvest prefix
//! - Fetches the linked document pages in bounded waves
//! - Cuts the content region out of every document page
//! - Saves one `<slug>.md` file per document

use crate::config::Config;
use crate::crawler::fetcher::{FetchFailure, FetchSettings, FetchedPage, HttpFetcher};
use crate::crawler::scheduler::BatchScheduler;
use crate::extract::extract_bounded_region;
use crate::links::{document_slug, filter_links, PageLink};
use crate::monitor::ResourceMonitor;
use crate::HarvestError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A document page whose content region was saved
#[derive(Debug, Clone)]
pub struct HarvestedDocument {
    /// Address the document was fetched from
    pub source_url: String,
    /// File-name slug derived from the address
    pub slug: String,
    /// Visible text of the listing link that pointed here
    pub link_text: String,
    /// Extracted content region
    pub content: String,
    /// Where the content was written
    pub path: PathBuf,
}

impl HarvestedDocument {
    /// Source address, or the file path for documents loaded from disk
    pub fn label(&self) -> String {
        if self.source_url.is_empty() {
            self.path.display().to_string()
        } else {
            self.source_url.clone()
        }
    }
}

/// Counters and results of one harvest
#[derive(Debug, Clone, Default)]
pub struct HarvestSummary {
    pub listing_pages_fetched: usize,
    pub listing_pages_failed: usize,
    pub links_found: usize,
    pub documents_fetched: usize,
    pub documents_failed: usize,
    /// Error pages and pages without a content region
    pub documents_skipped: usize,
    pub documents_saved: usize,
    pub write_failures: usize,
    pub peak_memory_bytes: u64,
    pub elapsed: Duration,
    pub failures: Vec<FetchFailure>,
    pub documents: Vec<HarvestedDocument>,
}

impl HarvestSummary {
    /// True when no fetch, extraction or write was lost
    pub fn is_complete(&self) -> bool {
        self.listing_pages_failed == 0
            && self.documents_failed == 0
            && self.documents_skipped == 0
            && self.write_failures == 0
    }

    /// Records a saved document, keyed by the file it was written to
    ///
    /// A later document written to the same file replaces the earlier one,
    /// so `documents_saved` counts distinct files.
    pub fn record_document(&mut self, document: HarvestedDocument) {
        match self.documents.iter_mut().find(|d| d.path == document.path) {
            Some(existing) => {
                tracing::warn!(
                    "{} overwrote {} from {}",
                    document.source_url,
                    existing.path.display(),
                    existing.source_url
                );
                *existing = document;
            }
            None => self.documents.push(document),
        }
        self.documents_saved = self.documents.len();
    }

    /// Share of fetched documents that ended up saved, in percent
    pub fn save_rate(&self) -> f64 {
        let attempted = self.documents_fetched + self.documents_failed;
        if attempted == 0 {
            return 0.0;
        }
        (self.documents_saved as f64 / attempted as f64) * 100.0
    }
}

/// What to do with one fetched document page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentVerdict {
    /// The content region to save
    Keep(String),
    /// The page is the site's error page
    ErrorPage,
    /// The sentinel markers were not found
    NoRegion,
}

/// Main harvest coordinator
pub struct Harvester {
    config: Arc<Config>,
    scheduler: BatchScheduler,
}

impl Harvester {
    /// Creates a harvester fetching over HTTP
    ///
    /// The fetch settings and the memory monitor are built once here and
    /// shared by every wave.
    pub fn new(config: Config) -> Self {
        let settings = FetchSettings::from_config(&config.crawler, &config.user_agent);
        let fetch_timeout = Duration::from_secs(config.crawler.fetch_timeout_secs);
        let scheduler = BatchScheduler::new(
            Arc::new(HttpFetcher::new(settings)),
            Arc::new(ResourceMonitor::new()),
            // Leave the client's own timeout a chance to report first
            fetch_timeout + Duration::from_secs(5),
        );
        Self::with_scheduler(config, scheduler)
    }

    /// Creates a harvester around an existing scheduler
    pub fn with_scheduler(config: Config, scheduler: BatchScheduler) -> Self {
        Self {
            config: Arc::new(config),
            scheduler,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs the whole harvest over the configured listing pages
    ///
    /// Only a failure to create the articles directory aborts the run;
    /// fetch, extraction and write failures are counted in the summary.
    pub async fn run(&self) -> Result<HarvestSummary, HarvestError> {
        let start_time = Instant::now();
        let articles_dir = PathBuf::from(&self.config.output.articles_dir);
        tokio::fs::create_dir_all(&articles_dir).await?;

        let mut summary = HarvestSummary::default();
        let source = &self.config.source;

        for page_number in source.first_page..=source.last_page {
            let Some(links) = self.harvest_listing(page_number, &mut summary).await else {
                continue;
            };
            tracing::info!("Page {} has {} links", page_number, links.len());

            self.harvest_documents(&links, &articles_dir, &mut summary)
                .await;
        }

        summary.peak_memory_bytes = self.scheduler.monitor().peak();
        summary.elapsed = start_time.elapsed();

        tracing::info!(
            "Harvest finished in {:?}: {} documents saved, {} fetch failures, {} skipped",
            summary.elapsed,
            summary.documents_saved,
            summary.documents_failed,
            summary.documents_skipped
        );
        if !summary.is_complete() {
            tracing::warn!("Harvest was partial; see the report for failures");
        }

        Ok(summary)
    }

    /// Fetches one listing page and returns its links under the harvest prefix
    pub async fn harvest_listing(
        &self,
        page_number: u32,
        summary: &mut HarvestSummary,
    ) -> Option<Vec<PageLink>> {
        let listing_url = self.config.source.listing_url_for(page_number);
        let report = self.scheduler.run(&[listing_url.clone()], 1).await;

        summary.failures.extend(report.failures);
        let Some(page) = report.pages.into_iter().next() else {
            tracing::warn!("Listing page {} could not be fetched", listing_url);
            summary.listing_pages_failed += 1;
            return None;
        };

        summary.listing_pages_fetched += 1;
        tracing::info!("list page {} scraped", page_number);

        let links = filter_links(&page.links.internal, &self.config.source.link_prefix);
        summary.links_found += links.len();
        Some(links)
    }

    /// Fetches the linked documents and saves their content regions
    async fn harvest_documents(
        &self,
        links: &[PageLink],
        articles_dir: &Path,
        summary: &mut HarvestSummary,
    ) {
        if links.is_empty() {
            return;
        }

        // One fetch per address; the first link's text labels the document
        let mut urls: Vec<String> = Vec::with_capacity(links.len());
        let mut link_text: HashMap<&str, &str> = HashMap::new();
        for link in links {
            if !link_text.contains_key(link.href.as_str()) {
                link_text.insert(link.href.as_str(), link.text.as_str());
                urls.push(link.href.clone());
            }
        }
        if urls.len() < links.len() {
            tracing::debug!("{} duplicate links dropped", links.len() - urls.len());
        }

        let limit = self.config.crawler.max_concurrent_pages_open as usize;
        let report = self.scheduler.run(&urls, limit).await;

        summary.documents_fetched += report.success_count;
        summary.documents_failed += report.failure_count;
        summary.failures.extend(report.failures);

        for page in &report.pages {
            let content = match self.extract_document(page) {
                DocumentVerdict::Keep(content) => content,
                DocumentVerdict::ErrorPage => {
                    tracing::warn!("{} is an error page, skipping", page.url);
                    summary.documents_skipped += 1;
                    continue;
                }
                DocumentVerdict::NoRegion => {
                    tracing::warn!("No content region found in {}, skipping", page.url);
                    summary.documents_skipped += 1;
                    continue;
                }
            };

            let slug = document_slug(&page.url, &self.config.source.link_prefix);
            let path = articles_dir.join(format!("{}.md", slug));

            if let Err(e) = tokio::fs::write(&path, content.as_bytes()).await {
                tracing::error!("Failed to save {}: {}", path.display(), e);
                summary.write_failures += 1;
                continue;
            }
            tracing::info!("{} saved", slug);

            summary.record_document(HarvestedDocument {
                source_url: page.url.clone(),
                slug,
                link_text: link_text
                    .get(page.url.as_str())
                    .map(|t| t.to_string())
                    .unwrap_or_default(),
                content,
                path,
            });
        }
    }

    /// Decides whether a fetched document page is kept, and what to keep
    pub fn extract_document(&self, page: &FetchedPage) -> DocumentVerdict {
        let source = &self.config.source;

        if let Some(prefix) = source.error_page_prefix.as_deref() {
            if !prefix.is_empty() && page.content.starts_with(prefix) {
                return DocumentVerdict::ErrorPage;
            }
        }

        let region = extract_bounded_region(&page.content, &source.start_marker, &source.end_marker);
        if region.trim().is_empty() {
            DocumentVerdict::NoRegion
        } else {
            DocumentVerdict::Keep(region)
        }
    }
}

/// Runs a complete harvest with the given configuration
///
/// # Example
///
/// ```no_run
/// use order_harvest::config::load_config;
/// use order_harvest::crawler::run_harvest;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let summary = run_harvest(config).await?;
/// println!("{} documents saved", summary.documents_saved);
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest(config: Config) -> Result<HarvestSummary, HarvestError> {
    Harvester::new(config).run().await
}
