#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API response types for the school map server.
//!
//! These types are serialized to JSON for the REST API and the published
//! `schools.json`. They are separate from [`School`] so the frontend
//! contract can stay flat while the store keeps coordinates optional.

use school_map_school_models::{School, StateTag};
use serde::{Deserialize, Serialize};

/// A located school as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSchool {
    /// School id.
    pub id: String,
    /// School name.
    pub name: String,
    /// School form token.
    pub schulform: String,
    /// District.
    pub kreis: String,
    /// Locality.
    pub ort: String,
    /// Social index rating (1-9).
    pub rating: i32,
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
    /// Originating state.
    pub state: StateTag,
}

impl ApiSchool {
    /// Converts `school`, or returns `None` if it has not been geocoded.
    #[must_use]
    pub fn from_located(school: School) -> Option<Self> {
        let coordinates = school.coordinates?;
        Some(Self {
            id: school.id,
            name: school.name,
            schulform: school.schulform,
            kreis: school.kreis,
            ort: school.ort,
            rating: school.rating,
            lat: coordinates.lat,
            lng: coordinates.lng,
            state: school.state,
        })
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}
