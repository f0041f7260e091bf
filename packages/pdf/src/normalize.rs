//! Whitespace normalization for extracted PDF text.
//!
//! `pdf_extract` reproduces the page layout with line breaks and runs of
//! padding spaces. The anchored parser works on byte offsets into a single
//! line, so every whitespace run (line breaks included) is collapsed into
//! one ASCII space. No other character is touched.

use regex::Regex;
use std::sync::LazyLock;

/// Any run of whitespace, including `\n`, `\r` and non-breaking spaces.
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Collapses `text` into a single whitespace-normalized line.
///
/// Leading and trailing whitespace is collapsed but not removed.
/// Normalizing an already-normalized string returns it unchanged.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_line_breaks_and_padding() {
        let raw = "Kiel\n0712345  GS\r\n  Grundschule\t am See   3\n";
        assert_eq!(normalize_text(raw), "Kiel 0712345 GS Grundschule am See 3 ");
    }

    #[test]
    fn is_idempotent() {
        let inputs = [
            "",
            " ",
            "\n\n",
            "a  b\n\nc",
            "\u{a0}Lübeck, Hansestadt\u{a0}\u{a0}0700001 GemS Schule 4",
            "already normalized",
        ];
        for input in inputs {
            let once = normalize_text(input);
            assert_eq!(normalize_text(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn leaves_case_accents_and_punctuation_alone() {
        assert_eq!(
            normalize_text("Rendsburg-Eckernförde – Büdelsdorf"),
            "Rendsburg-Eckernförde – Büdelsdorf"
        );
    }
}
