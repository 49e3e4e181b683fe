//! Batch scheduler running fetches in bounded waves
//!
//! This module handles:
//! - Partitioning a URL list into waves of at most `concurrency_limit`
//! - Dispatching one isolated fetch session per URL of a wave
//! - Waiting for the whole wave to settle before starting the next one
//! - Sampling memory before and after every wave
//! - Reassembling outcomes in dispatch order and counting failures

use crate::crawler::fetcher::{
    FailureKind, FetchFailure, FetchOutcome, FetchTarget, FetchedPage, Fetcher, SessionId,
};
use crate::monitor::{MemorySample, ResourceMonitor};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// Memory checkpoints and size of one wave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveStats {
    /// 1-based wave number within the run
    pub number: usize,
    /// Number of fetches dispatched in the wave
    pub size: usize,
    pub before: MemorySample,
    pub after: MemorySample,
}

/// Aggregate result of one scheduler run
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Successful pages, waves in submission order, dispatch order within a wave
    pub pages: Vec<FetchedPage>,
    pub success_count: usize,
    pub failure_count: usize,
    /// Failed fetches in the same order as `pages`
    pub failures: Vec<FetchFailure>,
    pub waves: Vec<WaveStats>,
    /// Sample taken after the last wave
    pub final_memory: MemorySample,
}

impl BatchReport {
    /// Number of URLs the run was given
    pub fn total(&self) -> usize {
        self.success_count + self.failure_count
    }
}

/// Drives fetch sessions in bounded concurrent waves
///
/// The scheduler owns exactly one fetch per submitted URL and never retries;
/// resubmit failed URLs in a later `run` to retry them.
pub struct BatchScheduler {
    fetcher: Arc<dyn Fetcher>,
    monitor: Arc<ResourceMonitor>,
    fetch_timeout: Duration,
    runs: AtomicU64,
}

impl BatchScheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Performs one fetch per target
    /// * `monitor` - Memory monitor sampled around each wave
    /// * `fetch_timeout` - Deadline for a single fetch; expiry becomes a timeout failure
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        monitor: Arc<ResourceMonitor>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            fetcher,
            monitor,
            fetch_timeout,
            runs: AtomicU64::new(0),
        }
    }

    pub fn monitor(&self) -> &ResourceMonitor {
        &self.monitor
    }

    /// Fetches every URL once, `concurrency_limit` at a time
    ///
    /// A limit of 0 is treated as 1.
    pub async fn run(&self, urls: &[String], concurrency_limit: usize) -> BatchReport {
        let limit = if concurrency_limit == 0 {
            tracing::warn!("Concurrency limit 0 requested, running sequentially");
            1
        } else {
            concurrency_limit
        };
        let run = self.runs.fetch_add(1, Ordering::Relaxed);

        let mut report = BatchReport::default();

        for (wave_index, wave) in urls.chunks(limit).enumerate() {
            let number = wave_index + 1;
            let offset = wave_index * limit;

            let before = self.monitor.sample();
            tracing::info!("Before batch {}: {}", number, before);

            let outcomes = self.run_wave(run, offset, wave).await;

            let after = self.monitor.sample();
            tracing::info!("After batch {}: {}", number, after);

            for (url, outcome) in wave.iter().zip(outcomes) {
                match outcome {
                    FetchOutcome::Success(page) => {
                        report.success_count += 1;
                        report.pages.push(page);
                    }
                    FetchOutcome::Failure(failure) => {
                        tracing::warn!("Error crawling {}: {} {}", url, failure.kind, failure.message);
                        report.failure_count += 1;
                        report.failures.push(failure);
                    }
                }
            }

            report.waves.push(WaveStats {
                number,
                size: wave.len(),
                before,
                after,
            });
        }

        report.final_memory = self.monitor.sample();
        tracing::info!(
            "Batch run {} finished: {} succeeded, {} failed. Final: {}",
            run,
            report.success_count,
            report.failure_count,
            report.final_memory
        );

        report
    }

    /// Runs one wave and returns its outcomes in dispatch order
    async fn run_wave(&self, run: u64, offset: usize, wave: &[String]) -> Vec<FetchOutcome> {
        let mut tasks = JoinSet::new();

        for (i, url) in wave.iter().enumerate() {
            let target = FetchTarget::new(url.clone(), SessionId::new(run, offset + i));
            let fetcher = Arc::clone(&self.fetcher);
            let deadline = self.fetch_timeout;

            tasks.spawn(async move {
                let url = target.url.clone();
                let outcome = match tokio::time::timeout(deadline, fetcher.fetch(target)).await {
                    Ok(outcome) => outcome,
                    Err(_) => FetchOutcome::Failure(FetchFailure::new(
                        url,
                        FailureKind::Timeout,
                        format!("no response within {:?}", deadline),
                    )),
                };
                (i, outcome)
            });
        }

        let mut slots: Vec<Option<FetchOutcome>> = vec![None; wave.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((i, outcome)) => slots[i] = Some(outcome),
                Err(e) => tracing::error!("Fetch task failed to complete: {}", e),
            }
        }

        // A panicked task leaves its slot empty
        slots
            .into_iter()
            .zip(wave)
            .map(|(slot, url)| {
                slot.unwrap_or_else(|| {
                    FetchOutcome::Failure(FetchFailure::new(
                        url.clone(),
                        FailureKind::Panicked,
                        "fetch task did not complete",
                    ))
                })
            })
            .collect()
    }
}
