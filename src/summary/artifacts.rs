use crate::extract::{split_into_sections, ContentSection};

/// Section titles mapped onto artifacts, in storage order
pub const SECTION_TITLES: [&str; 5] = [
    "Key Points",
    "Areas of Concern",
    "Constitutional Considerations",
    "Potential Implications",
    "Final Summary",
];

/// The five narrative sections of a report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionArtifacts {
    pub key_points: String,
    pub areas_of_concern: String,
    pub constitutional_considerations: String,
    pub potential_implications: String,
    pub final_summary: String,
}

impl SectionArtifacts {
    /// Maps sections onto the five fields by exact title
    ///
    /// Titles are compared case-sensitively. Sections with any other title
    /// are dropped, and the first section with a given title wins.
    pub fn from_sections(sections: &[ContentSection]) -> Self {
        let mut artifacts = Self::default();

        for section in sections {
            let slot = match section.title.as_str() {
                "Key Points" => &mut artifacts.key_points,
                "Areas of Concern" => &mut artifacts.areas_of_concern,
                "Constitutional Considerations" => &mut artifacts.constitutional_considerations,
                "Potential Implications" => &mut artifacts.potential_implications,
                "Final Summary" => &mut artifacts.final_summary,
                _ => continue,
            };
            if slot.is_empty() {
                *slot = section.body.clone();
            }
        }

        artifacts
    }

    /// Splits a markdown report and maps its sections
    pub fn from_report(report: &str) -> Self {
        Self::from_sections(&split_into_sections(report))
    }

    /// All five (title, content) pairs in storage order
    pub fn entries(&self) -> [(&'static str, &str); 5] {
        [
            (SECTION_TITLES[0], self.key_points.as_str()),
            (SECTION_TITLES[1], self.areas_of_concern.as_str()),
            (SECTION_TITLES[2], self.constitutional_considerations.as_str()),
            (SECTION_TITLES[3], self.potential_implications.as_str()),
            (SECTION_TITLES[4], self.final_summary.as_str()),
        ]
    }

    /// The (title, content) pairs that have content
    pub fn non_empty(&self) -> Vec<(&'static str, &str)> {
        self.entries()
            .into_iter()
            .filter(|(_, content)| !content.trim().is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "\
# Analysis of an Order

TLDR; it does things

## Key Points

- **Scope:** wide

## Areas of Concern

- **Reach:** unclear

## Constitutional Considerations:

- colon in the title does not match

## Final Summary

Overall significant.
";

    #[test]
    fn test_maps_exact_titles() {
        let artifacts = SectionArtifacts::from_report(REPORT);
        assert_eq!(artifacts.key_points, "- **Scope:** wide");
        assert_eq!(artifacts.areas_of_concern, "- **Reach:** unclear");
        assert_eq!(artifacts.constitutional_considerations, "");
        assert_eq!(artifacts.potential_implications, "");
        assert_eq!(artifacts.final_summary, "Overall significant.");
    }

    #[test]
    fn test_titles_are_case_sensitive() {
        let sections = vec![ContentSection::new("key points", "lower")];
        assert_eq!(SectionArtifacts::from_sections(&sections), SectionArtifacts::default());
    }

    #[test]
    fn test_first_matching_section_wins() {
        let sections = vec![
            ContentSection::new("Final Summary", "first"),
            ContentSection::new("Final Summary", "second"),
        ];
        assert_eq!(SectionArtifacts::from_sections(&sections).final_summary, "first");
    }

    #[test]
    fn test_non_empty_skips_missing_sections() {
        let artifacts = SectionArtifacts::from_report(REPORT);
        let titles: Vec<_> = artifacts.non_empty().into_iter().map(|(t, _)| t).collect();
        assert_eq!(titles, vec!["Key Points", "Areas of Concern", "Final Summary"]);
    }
}
