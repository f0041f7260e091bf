#![allow(clippy::module_name_repetitions)]
//! Canonical file paths for the school map data directory.
//!
//! All paths are relative to the project root's `data/` directory unless
//! overridden through the environment.

use std::path::{Path, PathBuf};

/// Environment variable overriding the store location.
pub const DB_PATH_ENV: &str = "SCHOOL_MAP_DB";

/// Returns the workspace root directory.
///
/// Resolved at compile time from `CARGO_MANIFEST_DIR`.
///
/// # Panics
///
/// Panics if the project root cannot be resolved.
#[must_use]
pub fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .expect("Failed to find project root from CARGO_MANIFEST_DIR")
        .to_path_buf()
}

/// Returns the `data/` directory path.
#[must_use]
pub fn data_dir() -> PathBuf {
    project_root().join("data")
}

/// Returns the default path of the schools `DuckDB` file.
#[must_use]
pub fn default_db_path() -> PathBuf {
    data_dir().join("schools.duckdb")
}

/// Returns the store path from [`DB_PATH_ENV`], or [`default_db_path`].
#[must_use]
pub fn db_path_from_env() -> PathBuf {
    std::env::var_os(DB_PATH_ENV).map_or_else(default_db_path, PathBuf::from)
}

/// Returns the `docs/` directory the static map is published from.
#[must_use]
pub fn docs_dir() -> PathBuf {
    project_root().join("docs")
}

/// Ensures a directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
