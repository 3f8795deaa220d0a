//! Control description text utilities
//!
//! Splits a rendered control statement into its introductory sentence and
//! its lettered sub-sections.

use std::sync::OnceLock;

use regex::Regex;

/// Numbered sub-item of a lettered sub-section, e.g. `"\n\tAC-2h.1."`
const SUB_ITEM_PATTERN: &str = r"\n\t?[A-Z]+-[0-9]+[a-z]\.([0-9]+)\.";

fn sub_item_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(SUB_ITEM_PATTERN).expect("sub-item regex is valid"))
}

/// Split a control statement into `(intro, sections)`.
///
/// Numbered sub-items (`AC-2h.1.`) are folded back into the lettered
/// section they belong to as an inline `(1)` before the text is split on
/// line breaks. The first line is the intro, every following line is a
/// section in reading order, with its leading indentation removed.
///
/// An absent statement yields `(None, [])`.
///
/// ```
/// use compliancekit::catalog::split_description;
///
/// let (intro, sections) = split_description(Some("A\nB\nC"));
/// assert_eq!(intro.as_deref(), Some("A"));
/// assert_eq!(sections, vec!["B", "C"]);
/// ```
pub fn split_description(statement: Option<&str>) -> (Option<String>, Vec<String>) {
    let Some(statement) = statement else {
        return (None, Vec::new());
    };

    let folded = sub_item_marker().replace_all(statement, " ($1)");

    let mut lines = folded.split('\n');
    let intro = lines.next().unwrap_or_default().to_string();
    let sections = lines
        .map(|line| line.trim_start_matches('\t').to_string())
        .collect();

    (Some(intro), sections)
}

/// Replace one line-break token with another, e.g. `"\n"` with `"<br />"`.
///
/// Absent text renders as an empty string.
pub fn replace_line_breaks(text: Option<&str>, from: &str, to: &str) -> String {
    match text {
        None => String::new(),
        Some(text) if text.contains(from) => text.split(from).collect::<Vec<_>>().join(to),
        Some(text) => text.to_string(),
    }
}
