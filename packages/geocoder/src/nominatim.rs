//! Nominatim / OpenStreetMap geocoder client.
//!
//! Nominatim has strict rate limits: **1 request per second** maximum on
//! the public instance. The client does not throttle itself; the caller
//! sleeps `rate_limit_ms` between requests.
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/>

use school_map_school_models::Coordinates;

use crate::service_registry::NominatimService;
use crate::{GeocodeError, Geocoder};

/// HTTP client for the Nominatim search endpoint.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
    country_code: String,
}

impl NominatimClient {
    /// Builds a client for `service`, sending its configured user agent.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the HTTP client cannot be built.
    pub fn new(service: &NominatimService) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .user_agent(service.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: service.base_url.clone(),
            country_code: service.country_code.clone(),
        })
    }
}

#[async_trait::async_trait]
impl Geocoder for NominatimClient {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", query),
                ("countrycodes", self.country_code.as_str()),
                ("format", "json"),
                ("limit", "1"),
            ])
            .send()
            .await?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodeError::RateLimited);
        }

        let body: serde_json::Value = resp.error_for_status()?.json().await?;
        parse_response(&body)
    }
}

/// Parses a Nominatim JSON response.
fn parse_response(body: &serde_json::Value) -> Result<Option<Coordinates>, GeocodeError> {
    let results = body.as_array().ok_or_else(|| GeocodeError::Parse {
        message: "Nominatim response is not an array".to_string(),
    })?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    let lat = first["lat"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing lat in Nominatim response".to_string(),
        })?;

    let lng = first["lon"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing lon in Nominatim response".to_string(),
        })?;

    if let Some(display_name) = first["display_name"].as_str() {
        log::trace!("Nominatim matched {display_name}");
    }

    Ok(Some(Coordinates { lat, lng }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service_registry::nominatim_service;

    #[test]
    fn parses_nominatim_result() {
        let body = serde_json::json!([{
            "lat": "54.3233",
            "lon": "10.1228",
            "display_name": "Grundschule, Kiel, Schleswig-Holstein, Deutschland"
        }]);
        let result = parse_response(&body).unwrap().unwrap();
        assert!((result.lat - 54.3233).abs() < 1e-4);
        assert!((result.lng - 10.1228).abs() < 1e-4);
    }

    #[test]
    fn parses_nominatim_empty() {
        let body = serde_json::json!([]);
        assert!(parse_response(&body).unwrap().is_none());
    }

    #[test]
    fn rejects_non_array_body() {
        let body = serde_json::json!({ "error": "Unable to geocode" });
        assert!(matches!(
            parse_response(&body),
            Err(GeocodeError::Parse { .. })
        ));
    }

    #[test]
    fn rejects_unparseable_coordinates() {
        let body = serde_json::json!([{ "lat": "n/a", "lon": "10.0" }]);
        assert!(matches!(
            parse_response(&body),
            Err(GeocodeError::Parse { .. })
        ));
    }

    #[test]
    fn builds_client_from_embedded_service() {
        let client = NominatimClient::new(&nominatim_service()).unwrap();
        assert_eq!(client.country_code, "de");
        assert!(client.base_url.starts_with("https://"));
    }
}
