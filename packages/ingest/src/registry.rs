//! Registry of all configured report sources.
//!
//! Each source is defined as a TOML file in `packages/ingest/sources/` and
//! embedded at compile time via [`include_str!`]. Adding a new source is as
//! simple as creating a new TOML file and adding it to the list below.

use crate::source_def::{SourceDefinition, parse_source_toml};

/// TOML configs embedded at compile time.
const SOURCE_TOMLS: &[(&str, &str)] = &[
    (
        "sh_sozialindex",
        include_str!("../sources/sh_sozialindex.toml"),
    ),
    (
        "hh_sozialindex",
        include_str!("../sources/hh_sozialindex.toml"),
    ),
];

/// Total number of configured sources (used in tests).
#[cfg(test)]
const EXPECTED_SOURCE_COUNT: usize = 2;

/// Returns all configured source definitions, parsed from embedded TOML.
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time guarantee
/// since the configs are embedded).
#[must_use]
pub fn all_sources() -> Vec<SourceDefinition> {
    SOURCE_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_source_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Looks up a source by id.
#[must_use]
pub fn find_source(id: &str) -> Option<SourceDefinition> {
    all_sources().into_iter().find(|s| s.id() == id)
}
