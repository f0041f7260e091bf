#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! PDF text extraction and social-index table parsing.
//!
//! The school data sources are published as PDF reports. This crate turns
//! them into [`School`] records in two steps: pure-Rust text extraction
//! ([`pdf_extract`]) and a layout-specific parser selected by
//! [`ExtractionStrategy`]:
//!
//! - [`anchored`]: records delimited by a 7-digit id and school-form token,
//!   with Kreis and Ort in front and a single-digit rating at the end.
//! - [`line_table`]: one record per line, name followed by two index
//!   columns.
//!
//! Parsing is side-effect free; persisting the records is the job of the
//! database crate.

pub mod anchored;
pub mod anchors;
pub mod line_table;
pub mod normalize;
pub mod prefix;
pub mod rating;

use std::path::Path;

use school_map_school_models::{School, StateTag};
use serde::Deserialize;

/// Errors specific to PDF extraction.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// PDF text extraction failed.
    #[error("PDF extraction error: {0}")]
    Extraction(String),

    /// A pattern built from the source configuration failed to compile.
    #[error("Invalid regex pattern: {0}")]
    Regex(#[from] regex::Error),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// How records are laid out in a report's text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// Id-anchored records with a Kreis/Ort prefix.
    Anchored {
        /// Known Kreis names, matched earliest-then-longest.
        #[serde(default = "prefix::default_gazetteer")]
        gazetteer: Vec<String>,
    },
    /// One record per line with two trailing index columns.
    LineTable(line_table::LineTableConfig),
}

/// Extracts the text content of the PDF at `path`.
///
/// # Errors
///
/// Returns [`PdfError::Io`] if the file cannot be read and
/// [`PdfError::Extraction`] if it is not a readable PDF.
pub fn extract_text_from_file(path: &Path) -> Result<String, PdfError> {
    let bytes = std::fs::read(path)?;

    log::debug!("Read {} bytes from {}", bytes.len(), path.display());

    extract_text_from_mem(&bytes)
}

/// Extracts the text content of an in-memory PDF.
///
/// # Errors
///
/// Returns [`PdfError::Extraction`] if the bytes are not a readable PDF.
pub fn extract_text_from_mem(bytes: &[u8]) -> Result<String, PdfError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| PdfError::Extraction(format!("failed to extract text from PDF: {e}")))?;

    log::debug!("Extracted {} characters of text", text.chars().count());

    Ok(text)
}

/// Extracts records from report text using the given strategy.
///
/// # Errors
///
/// Returns [`PdfError::Regex`] if a line table's configured marker cannot
/// be compiled into a pattern.
pub fn extract_schools(
    text: &str,
    strategy: &ExtractionStrategy,
    state: StateTag,
) -> Result<Vec<School>, PdfError> {
    match strategy {
        ExtractionStrategy::Anchored { gazetteer } => {
            Ok(anchored::extract(text, gazetteer, state))
        }
        ExtractionStrategy::LineTable(config) => line_table::extract(text, config, state),
    }
}
