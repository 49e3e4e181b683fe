//! Content extraction from fetched pages
//!
//! Two pure operations:
//! - cutting the content region of a page out from between two sentinel
//!   markers (page chrome removal)
//! - splitting a markdown document into titled sections at `## ` headings

mod region;
mod sections;

pub use region::extract_bounded_region;
pub use sections::{split_into_sections, ContentSection, SECTION_HEADING};
