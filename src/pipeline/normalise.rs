//! Normalisation: deterministic cleanup of extracted text before splitting.
//!
//! PDF extractors leave two kinds of debris that break line-anchored marker
//! matching: CRLF line endings, and invisible format characters (zero-width
//! spaces, BOMs, soft hyphens) in front of a line's first visible character.
//! CRLF becomes LF; a lone CR is not a line break and is kept. The format
//! characters are removed everywhere, so task text loses its soft hyphens
//! too.

/// Apply all normalisation rules to extracted text.
///
/// Rules (applied in order):
/// 1. Normalise line endings (CRLF → LF)
/// 2. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens, joiners)
pub fn normalise_text(input: &str) -> String {
    let s = normalise_line_endings(input);
    remove_invisible_chars(&s)
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n")
}

// ── Rule 2: Remove invisible Unicode characters ─────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalise_line_endings() {
        assert_eq!(normalise_line_endings("a\r\nb\r\nc"), "a\nb\nc");
    }

    #[test]
    fn lone_carriage_returns_are_kept() {
        assert_eq!(normalise_text("a\rb"), "a\rb");
        let pages = crate::pipeline::pages::split_pages(&normalise_text("1) a\r\r\r1) b"));
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn soft_hyphen_is_removed_from_words() {
        assert_eq!(normalise_text("рів\u{00AD}няння"), "рівняння");
    }

    #[test]
    fn test_remove_invisible() {
        let input = "\u{FEFF}Вправа\u{200B} 1\u{00AD}2";
        assert_eq!(remove_invisible_chars(input), "Вправа 12");
    }

    #[test]
    fn form_feed_survives() {
        assert_eq!(normalise_text("p1\r\n\x0Cp2"), "p1\n\x0Cp2");
    }
}
