// Argument formatting: turns a raw "##"-sectioned argument blob from the
// gateway into at most four displayable points.

/// Maximum number of points kept from one argument block.
pub const MAX_POINTS: usize = 4;

/// Shown in place of an argument panel that would otherwise be empty.
pub const NO_ARGUMENTS: &str = "No arguments available";

/// Section labels the debate backend puts on the first line of a section.
const LABELS: &[&str] = &["CLAIM", "COUNTER-CLAIM", "EVIDENCE", "CONCLUSION"];

/// Split a raw argument block into an ordered list of points.
///
/// Sections are delimited by `##` followed by whitespace. Empty sections are
/// dropped, a leading label on a section's first line is stripped, and the
/// result is truncated to [`MAX_POINTS`]. `None` and empty input yield an
/// empty list; callers that render a panel should go through
/// [`points_or_placeholder`].
pub fn format_arguments(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    split_sections(raw)
        .into_iter()
        .filter(|section| !section.trim().is_empty())
        .map(strip_label)
        .filter(|point| !point.is_empty())
        .take(MAX_POINTS)
        .collect()
}

/// Substitute the single [`NO_ARGUMENTS`] point for an empty list.
pub fn points_or_placeholder(points: Vec<String>) -> Vec<String> {
    if points.is_empty() {
        vec![NO_ARGUMENTS.to_string()]
    } else {
        points
    }
}

/// Split on every `##` that is immediately followed by at least one
/// whitespace character. The delimiter and the whole whitespace run are
/// consumed. Text before the first delimiter is its own section.
fn split_sections(raw: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut start = 0;
    let mut search = 0;

    while let Some(offset) = raw[search..].find("##") {
        let at = search + offset;
        let whitespace: usize = raw[at + 2..]
            .chars()
            .take_while(|c| c.is_whitespace())
            .map(char::len_utf8)
            .sum();

        if whitespace == 0 {
            // "###" and "##x" are not delimiters at this offset.
            search = at + 1;
            continue;
        }

        sections.push(&raw[start..at]);
        start = at + 2 + whitespace;
        search = start;
    }

    sections.push(&raw[start..]);
    sections
}

/// Strip a known label from the start of the section's first line.
fn strip_label(section: &str) -> String {
    let trimmed = section.trim();
    let first_line = trimmed.lines().next().unwrap_or_default();

    match LABELS.iter().find(|label| first_line.starts_with(**label)) {
        Some(label) => trimmed[label.len()..].trim().to_string(),
        None => trimmed.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
