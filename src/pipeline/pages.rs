//! Page splitting: one text blob → ordered page-text blocks.
//!
//! A page boundary is a form feed or a run of three or more newlines (blank
//! lines may contain whitespace). This is a layout heuristic, not a page
//! model: documents without blank-line separated layout are mis-split, and
//! the page numbers downstream are positions in this split, not physical
//! PDF pages.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

static RE_PAGE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x0C|\n\s*\n\s*\n+").unwrap());

/// Split `text` into trimmed, non-empty pages.
///
/// Always returns at least one page: when every candidate is empty (e.g.
/// the text is all whitespace), the original text is returned as the only
/// page.
pub fn split_pages(text: &str) -> Vec<String> {
    let pages: Vec<String> = RE_PAGE_BREAK
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    if pages.is_empty() {
        warn!("Page splitter found no content; treating the whole text as one page");
        return vec![text.to_string()];
    }

    debug!("Split text into {} pages", pages.len());
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_delimiter_yields_single_trimmed_page() {
        let text = "  1) First task.\nsecond line\n\nstill page one  ";
        assert_eq!(
            split_pages(text),
            vec!["1) First task.\nsecond line\n\nstill page one"]
        );
    }

    #[test]
    fn splits_on_form_feed() {
        assert_eq!(split_pages("page one\x0Cpage two"), vec!["page one", "page two"]);
    }

    #[test]
    fn splits_on_two_blank_lines() {
        assert_eq!(split_pages("a\n\n\nb"), vec!["a", "b"]);
        assert_eq!(split_pages("a\n  \n\t\n\n\nb"), vec!["a", "b"]);
    }

    #[test]
    fn single_blank_line_is_not_a_boundary() {
        assert_eq!(split_pages("a\n\nb"), vec!["a\n\nb"]);
        assert_eq!(split_pages("a\n   \nb"), vec!["a\n   \nb"]);
    }

    #[test]
    fn empty_candidates_are_dropped() {
        assert_eq!(
            split_pages("\x0C\x0Cone\x0C   \x0Ctwo\n\n\n\n"),
            vec!["one", "two"]
        );
    }

    #[test]
    fn whitespace_only_falls_back_to_raw_text() {
        assert_eq!(split_pages(" \n\x0C\n "), vec![" \n\x0C\n "]);
        assert_eq!(split_pages(""), vec![""]);
    }
}
