//! Line table parser (Hamburg Sozialindex changes report).
//!
//! This report has no ids. Each data line is
//! `<Schulname> <old index> <new index>` where an index is either a number
//! or the "not available" marker. Only the new index is kept; lines whose
//! new index is not available have no current rating and are dropped.

use regex::Regex;
use school_map_school_models::{School, StateTag, UNKNOWN_SCHULFORM};
use serde::Deserialize;

use crate::PdfError;

/// Settings for one line table source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LineTableConfig {
    /// Lines starting with any of these are headers, footers or notes.
    #[serde(default = "default_skip_prefixes")]
    pub skip_prefixes: Vec<String>,
    /// Token the report uses for a missing index.
    #[serde(default = "default_not_available")]
    pub not_available: String,
    /// Prefix of the synthetic ids (`HH` gives `HH-0001`).
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,
    /// Zero-padded width of the sequence number.
    #[serde(default = "default_id_width")]
    pub id_width: usize,
    /// Kreis assigned to every record.
    #[serde(default = "default_place")]
    pub region: String,
    /// Ort assigned to every record.
    #[serde(default = "default_place")]
    pub locality: String,
    /// School form assigned to every record.
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_skip_prefixes() -> Vec<String> {
    ["Schulname", "--", "Erläuterungen", "Bei Schulen", "Schulen in"]
        .into_iter()
        .map(str::to_owned)
        .collect()
}

fn default_not_available() -> String {
    "nv".to_owned()
}

fn default_id_prefix() -> String {
    "HH".to_owned()
}

const fn default_id_width() -> usize {
    4
}

fn default_place() -> String {
    "Hamburg".to_owned()
}

fn default_category() -> String {
    UNKNOWN_SCHULFORM.to_owned()
}

impl Default for LineTableConfig {
    fn default() -> Self {
        Self {
            skip_prefixes: default_skip_prefixes(),
            not_available: default_not_available(),
            id_prefix: default_id_prefix(),
            id_width: default_id_width(),
            region: default_place(),
            locality: default_place(),
            category: default_category(),
        }
    }
}

impl LineTableConfig {
    fn data_line_regex(&self) -> Result<Regex, PdfError> {
        let na = regex::escape(&self.not_available);
        Ok(Regex::new(&format!(
            r"^(.+?)\s+({na}|[0-9]+)\s+({na}|[0-9]+)$"
        ))?)
    }

    fn is_noise(&self, line: &str) -> bool {
        line.is_empty()
            || self
                .skip_prefixes
                .iter()
                .any(|prefix| line.starts_with(prefix.as_str()))
    }

    fn synthetic_id(&self, seq: usize) -> String {
        format!("{}-{seq:0width$}", self.id_prefix, width = self.id_width)
    }
}

/// Extracts all rated records from raw report text, line by line.
///
/// # Errors
///
/// Returns [`PdfError::Regex`] if the configured marker yields an invalid
/// pattern.
pub fn extract(
    text: &str,
    config: &LineTableConfig,
    state: StateTag,
) -> Result<Vec<School>, PdfError> {
    let re = config.data_line_regex()?;
    let mut schools = Vec::new();
    let mut lines_seen = 0usize;

    for line in text.lines().map(str::trim) {
        lines_seen += 1;
        if config.is_noise(line) {
            continue;
        }

        let Some(caps) = re.captures(line) else {
            log::debug!("Unmatched line: {line:?}");
            continue;
        };

        let raw_rating = &caps[3];
        if raw_rating == config.not_available {
            continue;
        }

        let Ok(rating) = raw_rating.parse::<i32>() else {
            log::warn!("Rating {raw_rating:?} out of range in line {line:?}");
            continue;
        };

        schools.push(School {
            id: config.synthetic_id(schools.len() + 1),
            name: caps[1].trim().to_owned(),
            schulform: config.category.clone(),
            kreis: config.region.clone(),
            ort: config.locality.clone(),
            rating,
            state,
            coordinates: None,
        });
    }

    log::info!(
        "Parsed {lines_seen} lines, found {} schools",
        schools.len()
    );

    Ok(schools)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<School> {
        extract(text, &LineTableConfig::default(), StateTag::Hh).unwrap()
    }

    #[test]
    fn skips_not_available_rating() {
        assert!(parse("Grundschule Nord  12  nv").is_empty());
    }

    #[test]
    fn keeps_second_token_as_rating() {
        let schools = parse("Grundschule Nord  12  8");
        assert_eq!(schools.len(), 1);
        assert_eq!(schools[0].name, "Grundschule Nord");
        assert_eq!(schools[0].rating, 8);
        assert_eq!(schools[0].id, "HH-0001");
        assert_eq!(schools[0].schulform, UNKNOWN_SCHULFORM);
        assert_eq!(schools[0].kreis, "Hamburg");
        assert_eq!(schools[0].ort, "Hamburg");
        assert_eq!(schools[0].state, StateTag::Hh);
    }

    #[test]
    fn old_index_may_be_missing() {
        let schools = parse("Stadtteilschule Altona nv 3");
        assert_eq!(schools[0].rating, 3);
        assert_eq!(schools[0].name, "Stadtteilschule Altona");
    }

    #[test]
    fn ids_count_only_produced_records() {
        let text = "Schulname Sozialindex alt Sozialindex neu\n\
            \n\
            Schule A 1 2\n\
            Schule B 3 nv\n\
            -- 1 of 12 --\n\
            Schule C 4 5\n\
            Erläuterungen: nv = nicht vorhanden\n\
            Schulen in freier Trägerschaft 1 2\n";
        let schools = parse(text);
        let ids: Vec<&str> = schools.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["HH-0001", "HH-0002"]);
        assert_eq!(schools[1].name, "Schule C");
        assert_eq!(schools[1].rating, 5);
    }

    #[test]
    fn digits_inside_name_are_kept() {
        let schools = parse("Gymnasium Klosterschule 2 3 6");
        assert_eq!(schools[0].name, "Gymnasium Klosterschule 2");
        assert_eq!(schools[0].rating, 6);
    }

    #[test]
    fn lines_without_two_indices_are_ignored() {
        assert!(parse("Grundschule ohne Index\nSchule 4").is_empty());
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: LineTableConfig =
            serde_json::from_value(serde_json::json!({ "id_prefix": "HB" })).unwrap();
        assert_eq!(config.id_prefix, "HB");
        assert_eq!(config.not_available, "nv");
        assert_eq!(config.synthetic_id(7), "HB-0007");
    }
}
