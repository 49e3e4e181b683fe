use serde::Serialize;

/// Line prefix that opens a new section
pub const SECTION_HEADING: &str = "## ";

/// A titled section of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentSection {
    /// Heading text, trimmed
    pub title: String,

    /// Lines between this heading and the next, trimmed as a whole
    pub body: String,
}

impl ContentSection {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Splits a markdown document into sections at `## ` headings
///
/// - A line starting with `## ` closes the current section and opens a new
///   one titled by the rest of the line.
/// - Every other line is appended verbatim to the open section, except lines
///   that are empty or contain only whitespace, which are dropped. Markdown
///   spacing between list items therefore does not survive into a body.
/// - Anything before the first heading is discarded.
/// - Bodies are trimmed, and sections with an empty body are not emitted.
///
/// # Example
///
/// ```
/// use order_harvest::{split_into_sections, ContentSection};
///
/// let sections = split_into_sections("## A\nfoo\n## B\n\n## C\nbar\n");
/// assert_eq!(
///     sections,
///     vec![ContentSection::new("A", "foo"), ContentSection::new("C", "bar")]
/// );
/// ```
pub fn split_into_sections(text: &str) -> Vec<ContentSection> {
    let mut sections = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in text.lines() {
        if let Some(title) = line.strip_prefix(SECTION_HEADING) {
            if let Some((title, body)) = current.take() {
                push_section(&mut sections, title, &body);
            }
            current = Some((title.trim().to_string(), Vec::new()));
        } else if let Some((_, body)) = current.as_mut() {
            if !line.trim().is_empty() {
                body.push(line);
            }
        }
    }

    if let Some((title, body)) = current {
        push_section(&mut sections, title, &body);
    }

    sections
}

fn push_section(sections: &mut Vec<ContentSection>, title: String, lines: &[&str]) {
    let body = lines.join("\n").trim().to_string();
    if body.is_empty() {
        return;
    }
    sections.push(ContentSection { title, body });
}
