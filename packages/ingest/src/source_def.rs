//! Config-driven report source definitions.

use std::path::PathBuf;

use school_map_pdf::ExtractionStrategy;
use school_map_school_models::StateTag;
use serde::Deserialize;

/// One published social index report.
///
/// Loaded from TOML files at compile time (see [`crate::registry`]).
#[derive(Debug, Clone, Deserialize)]
pub struct SourceDefinition {
    /// Unique identifier (e.g., `"sh_sozialindex"`), also the `_meta` key
    /// prefix.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// State every record of this report belongs to.
    pub state: StateTag,
    /// Report file name, relative to the `data/` directory.
    pub pdf_path: PathBuf,
    /// How records are laid out in the report text.
    pub layout: ExtractionStrategy,
}

impl SourceDefinition {
    /// Returns the source identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable source name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the report location used when none is given explicitly.
    #[must_use]
    pub fn default_pdf_path(&self) -> PathBuf {
        school_map_database::paths::data_dir().join(&self.pdf_path)
    }
}

/// Parses a [`SourceDefinition`] from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or missing required fields.
pub fn parse_source_toml(toml_str: &str) -> Result<SourceDefinition, String> {
    toml::de::from_str(toml_str).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_anchored_source() {
        let src = parse_source_toml(
            r#"
            id = "test"
            name = "Test"
            state = "SH"
            pdf_path = "report.pdf"

            [layout]
            type = "anchored"
            gazetteer = ["Kiel", "Plön"]
            "#,
        )
        .unwrap();

        assert_eq!(src.state, StateTag::Sh);
        assert_eq!(
            src.layout,
            ExtractionStrategy::Anchored {
                gazetteer: vec!["Kiel".to_owned(), "Plön".to_owned()],
            }
        );
        assert!(src.default_pdf_path().ends_with("data/report.pdf"));
    }

    #[test]
    fn line_table_fields_default() {
        let src = parse_source_toml(
            r#"
            id = "test"
            name = "Test"
            state = "HH"
            pdf_path = "report.pdf"

            [layout]
            type = "line_table"
            id_prefix = "T"
            "#,
        )
        .unwrap();

        let ExtractionStrategy::LineTable(config) = &src.layout else {
            panic!("expected line table layout");
        };
        assert_eq!(config.id_prefix, "T");
        assert_eq!(config.not_available, "nv");
        assert_eq!(config.id_width, 4);
    }

    #[test]
    fn rejects_unknown_state() {
        let err = parse_source_toml(
            r#"
            id = "test"
            name = "Test"
            state = "BY"
            pdf_path = "report.pdf"

            [layout]
            type = "anchored"
            "#,
        )
        .unwrap_err();
        assert!(err.contains("BY") || err.contains("variant"), "{err}");
    }
}
