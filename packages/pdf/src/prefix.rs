//! Kreis / Ort classification of a record prefix.
//!
//! In the anchored layout the text before each anchor holds the Kreis and
//! the Ort, separated by nothing but a space. Kreis names may themselves
//! contain spaces, commas and dashes, so they are recognised against a
//! fixed gazetteer instead of being split positionally.

/// Kreise and kreisfreie Städte of Schleswig-Holstein as they are spelled
/// in the Sozialindex report.
pub const KREISE: &[&str] = &[
    "Rendsburg-Eckernförde",
    "Schleswig-Flensburg",
    "Hzgt. Lauenburg",
    "Herzogtum Lauenburg",
    "Lübeck, Hansestadt",
    "Dithmarschen",
    "Nordfriesland",
    "Ostholstein",
    "Pinneberg",
    "Plön",
    "Segeberg",
    "Steinburg",
    "Stormarn",
    "Kiel",
    "Flensburg",
    "Neumünster",
];

/// Returns [`KREISE`] as owned strings.
#[must_use]
pub fn default_gazetteer() -> Vec<String> {
    KREISE.iter().map(|&k| k.to_owned()).collect()
}

/// A classified prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix {
    /// Kreis name (gazetteer entry or first token).
    pub kreis: String,
    /// Ort, possibly empty.
    pub ort: String,
    /// Whether `kreis` came from the gazetteer rather than the positional
    /// fallback.
    pub matched: bool,
}

/// Finds the gazetteer entry occurring earliest in `text`.
///
/// Among entries starting at the same offset the longest wins; among equal
/// lengths the first in `gazetteer` order wins. Returns the entry and its
/// byte offset.
#[must_use]
pub fn find_kreis<'g, S: AsRef<str>>(text: &str, gazetteer: &'g [S]) -> Option<(&'g str, usize)> {
    let mut best: Option<(&'g str, usize)> = None;

    for entry in gazetteer {
        let entry = entry.as_ref();
        if entry.is_empty() {
            continue;
        }
        let Some(idx) = text.find(entry) else {
            continue;
        };
        best = match best {
            Some((current, current_idx))
                if current_idx < idx || (current_idx == idx && current.len() >= entry.len()) =>
            {
                Some((current, current_idx))
            }
            _ => Some((entry, idx)),
        };
    }

    best
}

/// Strips a leading `-` or `–` and the whitespace after it.
fn strip_leading_dash(s: &str) -> &str {
    s.strip_prefix('-')
        .or_else(|| s.strip_prefix('–'))
        .map_or(s, str::trim_start)
}

/// Classifies a raw (untrimmed) prefix region into Kreis and Ort.
///
/// If no gazetteer entry occurs, the first space-separated token becomes
/// the Kreis and the rest the Ort. That fallback cannot tell multi-word
/// Kreis names apart and is reported via [`Prefix::matched`].
#[must_use]
pub fn classify_prefix<S: AsRef<str>>(raw: &str, gazetteer: &[S]) -> Prefix {
    let prefix = raw.trim();

    let (kreis, ort, matched) = if let Some((kreis, idx)) = find_kreis(prefix, gazetteer) {
        (kreis, &prefix[idx + kreis.len()..], true)
    } else {
        prefix
            .split_once(' ')
            .map_or((prefix, "", false), |(kreis, ort)| (kreis, ort, false))
    };

    Prefix {
        kreis: kreis.to_owned(),
        ort: strip_leading_dash(ort.trim()).trim().to_owned(),
        matched,
    }
}
