#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geocoding for school map records.
//!
//! Schools are located through Nominatim / OpenStreetMap free-form search.
//! The service is configured by the embedded TOML in `services/` (see
//! [`service_registry`]) and each school is tried with the progressively
//! less specific queries built by [`query::query_strategies`].
//!
//! Callers depend on the [`Geocoder`] trait so the network client can be
//! swapped out in tests.

pub mod nominatim;
pub mod query;
pub mod service_registry;

use school_map_school_models::Coordinates;
use thiserror::Error;

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,
}

/// Resolves a free-form query to coordinates.
#[async_trait::async_trait]
pub trait Geocoder: Send + Sync {
    /// Returns the best match for `query`, or `None` if nothing matched.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the lookup itself fails.
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError>;
}
