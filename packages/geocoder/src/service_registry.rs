//! Compile-time embedded geocoding service configuration.
//!
//! The Nominatim settings live in `services/nominatim.toml` and are
//! embedded at compile time, so the binaries need no config file at
//! runtime.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Nominatim service configuration loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct NominatimService {
    /// Unique identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Whether geocoding runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Search endpoint (e.g., `"https://nominatim.openstreetmap.org/search"`).
    pub base_url: String,
    /// `User-Agent` sent with every request, required by the usage policy.
    pub user_agent: String,
    /// ISO country code restricting results.
    pub country_code: String,
    /// Country name appended to every free-form query.
    pub country_suffix: String,
    /// Minimum delay between requests in milliseconds.
    pub rate_limit_ms: u64,
    /// Kreis names to rewrite before querying.
    #[serde(default)]
    pub region_aliases: BTreeMap<String, String>,
}

const fn default_true() -> bool {
    true
}

impl NominatimService {
    /// Returns the name Nominatim knows `kreis` by.
    #[must_use]
    pub fn region_alias<'a>(&'a self, kreis: &'a str) -> &'a str {
        self.region_aliases.get(kreis).map_or(kreis, String::as_str)
    }
}

const NOMINATIM_TOML: &str = include_str!("../services/nominatim.toml");

/// Returns the embedded Nominatim configuration.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed (this is a compile-time
/// guarantee since the config is embedded).
#[must_use]
pub fn nominatim_service() -> NominatimService {
    toml::de::from_str(NOMINATIM_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse geocoding service 'nominatim': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_embedded_service() {
        let svc = nominatim_service();
        assert_eq!(svc.id, "nominatim");
        assert!(svc.enabled);
        assert!(!svc.base_url.is_empty());
        assert!(!svc.user_agent.is_empty());
        assert!(svc.rate_limit_ms >= 1000, "public Nominatim allows 1 req/s");
    }

    #[test]
    fn applies_region_aliases() {
        let svc = nominatim_service();
        assert_eq!(svc.region_alias("Hzgt. Lauenburg"), "Herzogtum Lauenburg");
        assert_eq!(svc.region_alias("Lübeck, Hansestadt"), "Lübeck");
        assert_eq!(svc.region_alias("Stormarn"), "Stormarn");
    }
}
