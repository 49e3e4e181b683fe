//! Output module for harvest reports and store statistics
//!
//! This module handles:
//! - Rendering a markdown report of one harvest
//! - Reading and printing document store statistics

mod markdown;
pub mod stats;

pub use markdown::{format_harvest_report, write_harvest_report};
pub use stats::{load_statistics, print_statistics, HarvestStatistics};

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Formats a byte count as mebibytes with two decimals
pub fn format_mib(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / BYTES_PER_MIB)
}
