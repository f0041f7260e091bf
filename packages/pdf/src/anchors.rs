//! Record anchors for the anchored (Schleswig-Holstein) layout.
//!
//! Every record in the normalized text contains exactly one anchor: the
//! 7-digit Dienststellennummer followed by the school-form token. The
//! anchors are the only reliable delimiters in the stream, so they are used
//! to cut the text into one segment per record.

use regex::Regex;
use std::sync::LazyLock;

/// A 7-digit id at a word boundary, whitespace, a word token, whitespace.
static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([0-9]{7})\s+(\w+)\s").expect("valid regex"));

/// A matched record anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// The 7-digit record id.
    pub id: String,
    /// The school-form token following the id.
    pub schulform: String,
    /// Byte offset of the first character of the match.
    pub start: usize,
    /// Byte length of the whole match, trailing whitespace included.
    pub len: usize,
}

impl Anchor {
    /// Byte offset just past the match.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Finds all non-overlapping anchors in `text`, left to right.
#[must_use]
pub fn scan_anchors(text: &str) -> Vec<Anchor> {
    ANCHOR_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(Anchor {
                id: caps[1].to_owned(),
                schulform: caps[2].to_owned(),
                start: whole.start(),
                len: whole.len(),
            })
        })
        .collect()
}

/// One anchor together with the text it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    /// The anchor that opens this segment.
    pub anchor: &'a Anchor,
    /// The anchor's own matched text.
    pub anchor_text: &'a str,
    /// Text from the end of the anchor to the start of the next anchor (or
    /// the end of the text for the last anchor).
    pub body: &'a str,
}

/// The normalized text cut at its anchors.
///
/// `leading` followed by every segment's `anchor_text` and `body`, in
/// order, is exactly the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation<'a> {
    /// Text before the first anchor (the whole text if there are none).
    pub leading: &'a str,
    /// One segment per anchor, in text order.
    pub segments: Vec<Segment<'a>>,
}

/// Splits `text` into segments at the given anchors.
///
/// `anchors` must come from [`scan_anchors`] on the same `text`.
#[must_use]
pub fn split_segments<'a>(text: &'a str, anchors: &'a [Anchor]) -> Segmentation<'a> {
    let leading_end = anchors.first().map_or(text.len(), |a| a.start);

    let segments = anchors
        .iter()
        .enumerate()
        .map(|(i, anchor)| {
            let body_end = anchors.get(i + 1).map_or(text.len(), |next| next.start);
            Segment {
                anchor,
                anchor_text: &text[anchor.start..anchor.end()],
                body: &text[anchor.end()..body_end],
            }
        })
        .collect();

    Segmentation {
        leading: &text[..leading_end],
        segments,
    }
}
