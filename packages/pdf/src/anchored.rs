//! Anchored layout parser (Schleswig-Holstein Sozialindex).
//!
//! Record layout after normalization:
//!
//! ```text
//! <Kreis> <Ort> <7-digit id> <Schulform> <Name> <rating> <Kreis> <Ort> <id> ...
//! ```
//!
//! Anchors cut the stream into segments, the rating splits each body into
//! the record's name and the next record's prefix, and the prefix is
//! classified against the gazetteer.

use school_map_school_models::{School, StateTag};

use crate::anchors::{scan_anchors, split_segments};
use crate::normalize::normalize_text;
use crate::prefix::classify_prefix;
use crate::rating::locate_rating;

/// Extracts all records from raw (un-normalized) report text.
///
/// Anchors without a rating are skipped with a warning.
#[must_use]
pub fn extract<S: AsRef<str>>(text: &str, gazetteer: &[S], state: StateTag) -> Vec<School> {
    let normalized = normalize_text(text);
    let anchors = scan_anchors(&normalized);

    log::info!("Found {} potential entries", anchors.len());

    let segmentation = split_segments(&normalized, &anchors);
    let mut schools = Vec::with_capacity(anchors.len());
    let mut prefix = segmentation.leading;

    for segment in &segmentation.segments {
        let Some(rating) = locate_rating(segment.body) else {
            log::warn!("No valid rating found for ID {}", segment.anchor.id);
            prefix = segment.body;
            continue;
        };

        let classified = classify_prefix(prefix, gazetteer);
        if !classified.matched {
            log::debug!(
                "No known Kreis in prefix for ID {}, using {:?} / {:?}",
                segment.anchor.id,
                classified.kreis,
                classified.ort
            );
        }

        schools.push(School {
            id: segment.anchor.id.clone(),
            name: rating.name.to_owned(),
            schulform: segment.anchor.schulform.clone(),
            kreis: classified.kreis,
            ort: classified.ort,
            rating: rating.value,
            state,
            coordinates: None,
        });

        prefix = &segment.body[rating.end..];
    }

    log::info!("Extracted {} schools", schools.len());

    schools
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefix::KREISE;

    const REPORT: &str = "Sozialindex für Schulen\n\
        Kreis Ort Dienststellennummer Schulform Schulname Index\n\
        Kiel  0712345 GS Grundschule Nord 3\n\
        Rendsburg-Eckernförde Büdelsdorf 0754321 GemS Gemeinschaftsschule\n\
        am Markt 5\n\
        Lübeck, Hansestadt - Travemünde 0700003 Gym Schule 5 Teststraße 3 7\n";

    #[test]
    fn extracts_every_record() {
        let schools = extract(REPORT, KREISE, StateTag::Sh);
        assert_eq!(schools.len(), 3);

        assert_eq!(schools[0].id, "0712345");
        assert_eq!(schools[0].schulform, "GS");
        assert_eq!(schools[0].name, "Grundschule Nord");
        assert_eq!(schools[0].kreis, "Kiel");
        assert_eq!(schools[0].ort, "");
        assert_eq!(schools[0].rating, 3);
        assert_eq!(schools[0].state, StateTag::Sh);
        assert!(schools[0].is_pending_geocode());

        assert_eq!(schools[1].id, "0754321");
        assert_eq!(schools[1].name, "Gemeinschaftsschule am Markt");
        assert_eq!(schools[1].kreis, "Rendsburg-Eckernförde");
        assert_eq!(schools[1].ort, "Büdelsdorf");
        assert_eq!(schools[1].rating, 5);

        assert_eq!(schools[2].name, "Schule 5 Teststraße 3");
        assert_eq!(schools[2].kreis, "Lübeck, Hansestadt");
        assert_eq!(schools[2].ort, "Travemünde");
        assert_eq!(schools[2].rating, 7);
    }

    #[test]
    fn skips_anchor_without_rating() {
        let text = "Kiel Mitte 0700001 GS Schule ohne Index Plön Preetz 0700002 GS Schule 4";
        let schools = extract(text, KREISE, StateTag::Sh);
        assert_eq!(schools.len(), 1);
        assert_eq!(schools[0].id, "0700002");
        assert_eq!(schools[0].rating, 4);
        assert_eq!(schools[0].kreis, "Plön");
    }

    #[test]
    fn unmatched_prefix_uses_first_token() {
        let schools = extract("Hamburg Altona 0700001 GS Schule 2", KREISE, StateTag::Sh);
        assert_eq!(schools[0].kreis, "Hamburg");
        assert_eq!(schools[0].ort, "Altona");
    }

    #[test]
    fn no_anchors_yields_nothing() {
        assert!(extract("Erläuterungen zum Sozialindex 1 2 3", KREISE, StateTag::Sh).is_empty());
    }
}
