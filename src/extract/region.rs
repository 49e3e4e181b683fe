/// Returns the text strictly between two sentinel markers
///
/// # Marker Rule
///
/// The region starts right after the **first** occurrence of `start` and ends
/// right before the **first** occurrence of `end` found after that point.
/// When `start` and `end` are the same marker this is the text between its
/// first and second occurrence.
///
/// An empty string is returned when either marker is empty, when `start`
/// does not occur, or when `end` does not occur after it.
///
/// # Example
///
/// ```
/// use order_harvest::extract_bounded_region;
///
/// let page = "nav [Actions] the order text * [News] footer";
/// assert_eq!(extract_bounded_region(page, "[Actions]", "* [News]"), " the order text ");
/// ```
pub fn extract_bounded_region(text: &str, start: &str, end: &str) -> String {
    if start.is_empty() || end.is_empty() {
        return String::new();
    }

    let Some(start_at) = text.find(start) else {
        return String::new();
    };
    let after_start = &text[start_at + start.len()..];

    match after_start.find(end) {
        Some(end_at) => after_start[..end_at].to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_present() {
        let text = "chrome [Presidential Actions]\nBody line\n* [News] more chrome";
        assert_eq!(
            extract_bounded_region(text, "[Presidential Actions]", "* [News]"),
            "\nBody line\n"
        );
    }

    #[test]
    fn test_first_occurrences_win() {
        let text = "a START one END two START three END";
        assert_eq!(extract_bounded_region(text, "START", "END"), " one ");
    }

    #[test]
    fn test_end_before_start_is_ignored() {
        let text = "END preface START body END tail";
        assert_eq!(extract_bounded_region(text, "START", "END"), " body ");
    }

    #[test]
    fn test_same_marker_takes_first_pair() {
        assert_eq!(extract_bounded_region("x###middle###y###z", "###", "###"), "middle");
    }

    #[test]
    fn test_same_marker_single_occurrence_is_empty() {
        assert_eq!(extract_bounded_region("x###only", "###", "###"), "");
    }

    #[test]
    fn test_missing_start_is_empty() {
        assert_eq!(extract_bounded_region("no markers here", "START", "END"), "");
    }

    #[test]
    fn test_missing_end_is_empty() {
        assert_eq!(extract_bounded_region("START but no close", "START", "END"), "");
    }

    #[test]
    fn test_adjacent_markers_give_empty_region() {
        assert_eq!(extract_bounded_region("STARTEND", "START", "END"), "");
    }

    #[test]
    fn test_empty_markers_are_rejected() {
        assert_eq!(extract_bounded_region("abc", "", "c"), "");
        assert_eq!(extract_bounded_region("abc", "a", ""), "");
    }

    #[test]
    fn test_multibyte_text() {
        let text = "→ «début» contenu «fin» ←";
        assert_eq!(extract_bounded_region(text, "«début»", "«fin»"), " contenu ");
    }
}
