#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! School record types shared across the school map toolchain.
//!
//! A [`School`] is the unit produced by the PDF extractors and persisted by
//! the reconciler. Its `id` is the sole reconciliation key; the
//! [`Coordinates`] are filled in later by the geocoding pass.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// School-form sentinel used when a source does not provide a school type.
pub const UNKNOWN_SCHULFORM: &str = "Unbekannt";

/// Which source dataset produced a record.
///
/// The two datasets use different social-index scales, so the tag also
/// determines how `rating` is interpreted downstream.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum StateTag {
    /// Schleswig-Holstein (anchored layout, ratings 1-9).
    Sh,
    /// Hamburg (line table layout).
    Hh,
}

/// A geocoded position (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

impl Coordinates {
    /// Builds coordinates from two nullable columns.
    ///
    /// Returns `None` unless both values are present, so a half-populated
    /// row is treated as pending geocode.
    #[must_use]
    pub const fn from_columns(lat: Option<f64>, lng: Option<f64>) -> Option<Self> {
        match (lat, lng) {
            (Some(lat), Some(lng)) => Some(Self { lat, lng }),
            _ => None,
        }
    }
}

/// A school as extracted from a source and stored in the `schools` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct School {
    /// Stable identifier (7-digit Dienststellennummer or a synthetic id).
    pub id: String,
    /// Display name, trimmed.
    pub name: String,
    /// School form token (e.g. `"GS"`), or [`UNKNOWN_SCHULFORM`].
    pub schulform: String,
    /// Enclosing Kreis or kreisfreie Stadt.
    pub kreis: String,
    /// Place within the Kreis. May be empty.
    pub ort: String,
    /// Social-index rating.
    pub rating: i32,
    /// Source dataset.
    pub state: StateTag,
    /// Geocoded position, `None` while pending geocode.
    pub coordinates: Option<Coordinates>,
}

impl School {
    /// Returns `true` if the record still needs coordinates.
    #[must_use]
    pub const fn is_pending_geocode(&self) -> bool {
        self.coordinates.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_tag_round_trips_through_strings() {
        assert_eq!(StateTag::Sh.to_string(), "SH");
        assert_eq!("HH".parse::<StateTag>().unwrap(), StateTag::Hh);
        assert!("BY".parse::<StateTag>().is_err());
    }

    #[test]
    fn partial_columns_are_pending() {
        assert_eq!(Coordinates::from_columns(Some(53.1), None), None);
        assert_eq!(Coordinates::from_columns(None, Some(10.2)), None);
        assert_eq!(
            Coordinates::from_columns(Some(53.1), Some(10.2)),
            Some(Coordinates {
                lat: 53.1,
                lng: 10.2
            })
        );
    }
}
