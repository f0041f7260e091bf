#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Library for importing school social index reports into the `DuckDB`
//! store, geocoding them, and publishing the located records.

pub mod geocode;
pub mod registry;
pub mod source_def;

use std::path::Path;

use duckdb::Connection;
use school_map_database::reconcile::{ReconcileSummary, reconcile};
use school_map_database::schools::{StoreStatus, list_geocoded, record_import};
use school_map_database::{DbError, paths};
use school_map_pdf::PdfError;
use school_map_server_models::ApiSchool;

use crate::source_def::SourceDefinition;

/// Errors from ingestion commands.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Reading or parsing a report failed.
    #[error(transparent)]
    Pdf(#[from] PdfError),

    /// A store operation failed.
    #[error(transparent)]
    Db(#[from] DbError),

    /// The geocoding client could not be set up.
    #[error(transparent)]
    Geocode(#[from] school_map_geocoder::GeocodeError),

    /// Serializing the export failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing an output file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No source with the given id is configured.
    #[error("Unknown source: {0}")]
    UnknownSource(String),
}

/// Returns all configured report sources.
#[must_use]
pub fn all_sources() -> Vec<SourceDefinition> {
    registry::all_sources()
}

/// Looks up a configured source by id.
///
/// # Errors
///
/// Returns [`IngestError::UnknownSource`] if no source has that id.
pub fn source_by_id(id: &str) -> Result<SourceDefinition, IngestError> {
    registry::find_source(id).ok_or_else(|| IngestError::UnknownSource(id.to_owned()))
}

/// Imports the report of `source` at `pdf_path` into the store.
///
/// # Errors
///
/// Returns [`IngestError`] if the report cannot be read or the store update
/// fails. A failed store update leaves the store unchanged.
pub fn import_source(
    conn: &mut Connection,
    source: &SourceDefinition,
    pdf_path: &Path,
) -> Result<ReconcileSummary, IngestError> {
    log::info!("Importing {} from {}", source.id(), pdf_path.display());
    let text = school_map_pdf::extract_text_from_file(pdf_path)?;
    import_text(conn, source, &text)
}

/// Extracts records of `source` from already extracted report text and
/// reconciles them into the store.
///
/// # Errors
///
/// Returns [`IngestError`] if extraction or the store update fails.
pub fn import_text(
    conn: &mut Connection,
    source: &SourceDefinition,
    text: &str,
) -> Result<ReconcileSummary, IngestError> {
    let schools = school_map_pdf::extract_schools(text, &source.layout, source.state)?;

    log::info!("Extracted {} records from {}", schools.len(), source.id());

    let summary = reconcile(conn, &schools)?;
    record_import(conn, source.id(), schools.len())?;

    Ok(summary)
}

/// Writes every located school as a pretty-printed JSON array to `out`.
///
/// Returns the number of records written.
///
/// # Errors
///
/// Returns [`IngestError`] if the query, serialization or write fails.
pub fn export_json(conn: &Connection, out: &Path) -> Result<usize, IngestError> {
    let records: Vec<ApiSchool> = list_geocoded(conn)?
        .into_iter()
        .filter_map(ApiSchool::from_located)
        .collect();

    if let Some(parent) = out.parent() {
        paths::ensure_dir(parent)?;
    }
    std::fs::write(out, serde_json::to_string_pretty(&records)?)?;

    log::info!("Exported {} schools to {}", records.len(), out.display());

    Ok(records.len())
}

/// Returns the default export location, `docs/schools.json`.
#[must_use]
pub fn default_export_path() -> std::path::PathBuf {
    paths::docs_dir().join("schools.json")
}

/// Writes the raw extracted text of the PDF at `pdf` to `out`.
///
/// Returns the number of characters written.
///
/// # Errors
///
/// Returns [`IngestError`] if extraction or the write fails.
pub fn dump_text(pdf: &Path, out: &Path) -> Result<usize, IngestError> {
    let text = school_map_pdf::extract_text_from_file(pdf)?;
    if let Some(parent) = out.parent() {
        paths::ensure_dir(parent)?;
    }
    std::fs::write(out, &text)?;
    Ok(text.chars().count())
}

/// Formats the geocoding coverage of the store for display.
#[must_use]
pub fn format_status(status: &StoreStatus) -> String {
    format!(
        "Total schools: {}\nMissing coordinates: {}\nSuccess rate: {:.2}%",
        status.total,
        status.missing,
        status.success_rate()
    )
}
