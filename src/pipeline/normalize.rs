//! Normalization: deterministic cleanup of extracted PDF text.
//!
//! ## Why normalize before chunking?
//!
//! PDF text extraction is messy in ways that are *semantically harmless* but
//! *structurally hostile* to a paragraph-aligned chunker:
//!
//! - Windows-style `\r\n` line endings break the blank-line paragraph
//!   delimiter
//! - Trailing whitespace turns a "blank" line into a non-blank one
//! - Runs of 3+ newlines create phantom empty paragraphs
//! - Invisible Unicode (zero-width spaces, BOM, soft hyphens) inflates
//!   character counts and pollutes the text sent to the model
//!
//! These four cheap string/regex rules fix extractor quirks without touching
//! content. Each rule is a pure function, independently testable, applied in
//! a fixed order: line endings first so the later line-based rules see `\n`
//! only, blank-line collapsing last so it sees the trimmed lines.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all normalization rules to raw extracted text.
///
/// Rules (applied in order):
/// 1. Normalise line endings (CRLF → LF)
/// 2. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens, etc.)
/// 3. Trim trailing whitespace per line
/// 4. Collapse 3+ consecutive newlines down to one blank line
pub fn normalize_text(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = remove_invisible_chars(&s);
    let s = trim_trailing_whitespace(&s);
    collapse_blank_lines(&s)
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Remove invisible Unicode characters ──────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

// ── Rule 3: Trim trailing whitespace per line ────────────────────────────

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 4: Collapse excessive blank lines ───────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n").to_string()
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalise_line_endings() {
        assert_eq!(normalise_line_endings("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn test_remove_invisible() {
        let input = "hello\u{200B}world\u{FEFF}foo\u{00AD}bar";
        assert_eq!(remove_invisible_chars(input), "helloworldfoobar");
    }

    #[test]
    fn test_trim_trailing_whitespace() {
        assert_eq!(
            trim_trailing_whitespace("  hello   \nworld  "),
            "  hello\nworld"
        );
    }

    #[test]
    fn test_collapse_blank_lines() {
        assert_eq!(collapse_blank_lines("a\n\n\n\n\nb"), "a\n\nb");
        assert_eq!(collapse_blank_lines("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_full_pipeline_yields_clean_paragraphs() {
        let input = "Title   \r\n\r\n\r\nFirst paragraph.\u{FEFF}\r\n\r\nSecond paragraph.";
        let result = normalize_text(input);
        assert_eq!(result, "Title\n\nFirst paragraph.\n\nSecond paragraph.");
        // Exactly what the chunker's paragraph splitter expects.
        assert_eq!(result.split("\n\n").count(), 3);
    }

    #[test]
    fn test_crlf_becomes_paragraph_boundary() {
        let result = normalize_text("one\r\n\r\ntwo");
        assert_eq!(result, "one\n\ntwo");
    }
}
