//! Reply formatting for search results

use super::{NO_SNIPPET, NO_TITLE, SearchResult};

/// Fixed reply when a search produces no hits
pub const NO_RESULTS_MESSAGE: &str = "No results found.";

/// Format search results as a numbered, newline-joined summary
///
/// One line per result, in the order given:
/// `"<i>. <title> - <snippet> (Source: <link>)"`, 1-based. Empty title or
/// snippet fields render as their placeholders so every row keeps the same
/// shape.
#[must_use]
pub fn summarize(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return NO_RESULTS_MESSAGE.to_string();
    }

    results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            let title = if result.title.is_empty() {
                NO_TITLE
            } else {
                &result.title
            };
            let snippet = if result.snippet.is_empty() {
                NO_SNIPPET
            } else {
                &result.snippet
            };
            format!("{}. {title} - {snippet} (Source: {})", i + 1, result.link)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(title: &str, snippet: &str, link: &str) -> SearchResult {
        SearchResult {
            title: title.to_string(),
            snippet: snippet.to_string(),
            link: link.to_string(),
        }
    }

    #[test]
    fn empty_results_yield_fixed_message() {
        assert_eq!(summarize(&[]), NO_RESULTS_MESSAGE);
        // idempotent: same answer on every call
        assert_eq!(summarize(&[]), NO_RESULTS_MESSAGE);
    }

    #[test]
    fn two_results_format_exactly() {
        let results = vec![result("A", "s1", "L1"), result("B", "s2", "L2")];
        assert_eq!(
            summarize(&results),
            "1. A - s1 (Source: L1)\n2. B - s2 (Source: L2)"
        );
    }

    #[test]
    fn no_row_is_omitted() {
        let results: Vec<SearchResult> = (0..7)
            .map(|i| result(&format!("t{i}"), &format!("s{i}"), &format!("l{i}")))
            .collect();

        let summary = summarize(&results);
        assert_eq!(summary.lines().count(), 7);
        assert!(summary.lines().next().unwrap().starts_with("1. "));
        assert!(summary.lines().last().unwrap().starts_with("7. "));
    }

    #[test]
    fn empty_fields_render_as_placeholders() {
        let results = vec![result("", "", "L1")];
        assert_eq!(
            summarize(&results),
            format!("1. {NO_TITLE} - {NO_SNIPPET} (Source: L1)")
        );
    }
}
