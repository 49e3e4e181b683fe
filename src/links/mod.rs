//! Outbound link types, prefix filtering and document slugs
//!
//! Listing pages are harvested by keeping only the internal links whose
//! address starts with a configured prefix. Each harvested document is later
//! saved under a slug derived from its address.

use serde::Serialize;

/// A hyperlink found on a page: absolute address plus visible text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub href: String,
    pub text: String,
}

impl PageLink {
    pub fn new(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            text: text.into(),
        }
    }
}

/// Outbound links of a page, split by origin
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkSet {
    /// Links with the same scheme, host and port as the page
    pub internal: Vec<PageLink>,

    /// Every other link
    pub external: Vec<PageLink>,
}

impl LinkSet {
    pub fn len(&self) -> usize {
        self.internal.len() + self.external.len()
    }

    pub fn is_empty(&self) -> bool {
        self.internal.is_empty() && self.external.is_empty()
    }
}

/// Keeps the links whose address starts with `prefix`
///
/// The test is an exact, case-sensitive prefix match on the address as
/// given. Order is preserved and duplicates are kept.
pub fn filter_links(links: &[PageLink], prefix: &str) -> Vec<PageLink> {
    links
        .iter()
        .filter(|link| link.href.starts_with(prefix))
        .cloned()
        .collect()
}

/// Derives a file-name slug from a document address
///
/// The harvest prefix (and one `/` following it) is removed when the address
/// starts with it, one trailing `/` is removed, and every character that is
/// not an ASCII letter, digit or underscore becomes `_`.
pub fn document_slug(url: &str, prefix: &str) -> String {
    let tail = match url.strip_prefix(prefix) {
        Some(rest) if !prefix.is_empty() => rest.strip_prefix('/').unwrap_or(rest),
        _ => url,
    };
    let tail = tail.strip_suffix('/').unwrap_or(tail);

    tail.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
