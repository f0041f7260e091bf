//! Resumable geocoding of schools that still lack coordinates.
//!
//! Every pending school is tried with its query strategies in order, one
//! request at a time with the service's rate limit applied before each
//! request. The first hit is written back immediately, so an interrupted
//! run loses at most the school in flight.

use std::time::Duration;

use duckdb::Connection;
use school_map_database::DbError;
use school_map_database::schools::{pending_geocode, update_coordinates};
use school_map_geocoder::query::query_strategies;
use school_map_geocoder::service_registry::NominatimService;
use school_map_geocoder::{GeocodeError, Geocoder};
use school_map_school_models::{Coordinates, School};

/// Default maximum number of schools per geocoding run.
pub const DEFAULT_LIMIT: u64 = 10_000;

/// Back-off after the service answers with a rate-limit response.
const RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(60);

/// Counts reported by [`geocode_pending`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeocodeSummary {
    /// Schools that received coordinates.
    pub located: u64,
    /// Schools no strategy could locate.
    pub failed: u64,
}

/// Tries each query for `school` until one matches.
async fn locate(
    geocoder: &dyn Geocoder,
    service: &NominatimService,
    school: &School,
) -> Option<Coordinates> {
    for query in query_strategies(school, service) {
        tokio::time::sleep(Duration::from_millis(service.rate_limit_ms)).await;

        log::debug!("Trying {query:?}");

        match geocoder.geocode(&query).await {
            Ok(Some(coordinates)) => return Some(coordinates),
            Ok(None) => {}
            Err(e) => {
                log::warn!("Nominatim error for '{query}': {e}");
                if matches!(e, GeocodeError::RateLimited) {
                    log::warn!("Rate limited by Nominatim, waiting 60s...");
                    tokio::time::sleep(RATE_LIMIT_BACKOFF).await;
                }
            }
        }
    }

    None
}

/// Geocodes up to `limit` schools that have no coordinates yet.
///
/// Lookup errors count as misses; the school stays pending and is retried
/// on the next run.
///
/// # Errors
///
/// Returns [`DbError`] if selecting pending schools or writing coordinates
/// fails.
#[allow(clippy::future_not_send)]
pub async fn geocode_pending(
    conn: &Connection,
    geocoder: &dyn Geocoder,
    service: &NominatimService,
    limit: u64,
) -> Result<GeocodeSummary, DbError> {
    let mut summary = GeocodeSummary::default();

    if !service.enabled {
        log::info!("Geocoding service {} is disabled", service.id);
        return Ok(summary);
    }

    let pending = pending_geocode(conn, Some(limit))?;

    log::info!("Starting geocoding for {} schools...", pending.len());

    for school in &pending {
        if let Some(coordinates) = locate(geocoder, service, school).await {
            update_coordinates(conn, &school.id, coordinates)?;
            log::info!(
                "Located {} ({}): {}, {}",
                school.name,
                school.id,
                coordinates.lat,
                coordinates.lng
            );
            summary.located += 1;
        } else {
            log::info!("Not found: {} in {}", school.name, school.ort);
            summary.failed += 1;
        }
    }

    log::info!(
        "Geocoding complete. Located: {}. Failed: {}.",
        summary.located,
        summary.failed
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use school_map_database::reconcile::reconcile;
    use school_map_database::schools::{SchoolFilter, select_all};
    use school_map_geocoder::service_registry::nominatim_service;
    use school_map_school_models::StateTag;

    /// Answers only for the configured queries and records every request.
    struct MockGeocoder {
        hits: Vec<(&'static str, Coordinates)>,
        rate_limited: Vec<&'static str>,
        seen: Mutex<Vec<String>>,
    }

    impl MockGeocoder {
        fn new(hits: Vec<(&'static str, Coordinates)>) -> Self {
            Self {
                hits,
                rate_limited: Vec::new(),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn seen(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl Geocoder for MockGeocoder {
        async fn geocode(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
            self.seen.lock().unwrap().push(query.to_owned());
            if self.rate_limited.iter().any(|q| *q == query) {
                return Err(GeocodeError::RateLimited);
            }
            Ok(self
                .hits
                .iter()
                .find(|(q, _)| *q == query)
                .map(|(_, c)| *c))
        }
    }

    const MOELLN: Coordinates = Coordinates {
        lat: 53.62,
        lng: 10.68,
    };

    fn service() -> NominatimService {
        NominatimService {
            rate_limit_ms: 0,
            ..nominatim_service()
        }
    }

    fn school(id: &str, name: &str, ort: &str) -> School {
        School {
            id: id.to_owned(),
            name: name.to_owned(),
            schulform: "GS".to_owned(),
            kreis: "Hzgt. Lauenburg".to_owned(),
            ort: ort.to_owned(),
            rating: 3,
            state: StateTag::Sh,
            coordinates: None,
        }
    }

    fn store(schools: &[School]) -> Connection {
        let mut conn = school_map_database::open_in_memory().unwrap();
        reconcile(&mut conn, schools).unwrap();
        conn
    }

    #[tokio::test]
    async fn locates_with_fallback_strategy_and_writes_back() {
        let conn = store(&[school("0700001", "Grundschule am See, Außenstelle", "Mölln")]);
        let geocoder = MockGeocoder::new(vec![(
            "Grundschule am See, Mölln, Herzogtum Lauenburg, Germany",
            MOELLN,
        )]);

        let summary = geocode_pending(&conn, &geocoder, &service(), DEFAULT_LIMIT)
            .await
            .unwrap();
        assert_eq!(
            summary,
            GeocodeSummary {
                located: 1,
                failed: 0
            }
        );
        assert_eq!(geocoder.seen().len(), 2);

        let rows = select_all(&conn, SchoolFilter::All, None).unwrap();
        assert_eq!(rows[0].coordinates, Some(MOELLN));
    }

    #[tokio::test]
    async fn unmatched_school_stays_pending() {
        let conn = store(&[school("0700001", "Grundschule Nord", "Mölln")]);
        let geocoder = MockGeocoder::new(Vec::new());

        let summary = geocode_pending(&conn, &geocoder, &service(), DEFAULT_LIMIT)
            .await
            .unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(geocoder.seen().len(), 4);
        assert_eq!(pending_geocode(&conn, None).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn respects_limit_and_skips_located_schools() {
        let conn = store(&[
            school("0700001", "Schule A", "Mölln"),
            school("0700002", "Schule B", "Ratzeburg"),
            school("0700003", "Schule C", "Geesthacht"),
        ]);
        update_coordinates(&conn, "0700001", MOELLN).unwrap();

        let geocoder = MockGeocoder::new(Vec::new());
        let summary = geocode_pending(&conn, &geocoder, &service(), 1)
            .await
            .unwrap();

        assert_eq!(summary.failed, 1);
        assert!(geocoder.seen().iter().all(|q| q.contains("Ratzeburg")));
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_error_backs_off_and_continues() {
        let conn = store(&[school("0700001", "Grundschule Nord", "Mölln")]);
        let mut geocoder = MockGeocoder::new(vec![(
            "Grundschule Nord, Mölln, Germany",
            MOELLN,
        )]);
        geocoder.rate_limited = vec!["Grundschule Nord, Mölln, Herzogtum Lauenburg, Germany"];

        let summary = geocode_pending(&conn, &geocoder, &service(), DEFAULT_LIMIT)
            .await
            .unwrap();
        assert_eq!(summary.located, 1);
    }

    #[tokio::test]
    async fn disabled_service_does_nothing() {
        let conn = store(&[school("0700001", "Grundschule Nord", "Mölln")]);
        let geocoder = MockGeocoder::new(Vec::new());
        let disabled = NominatimService {
            enabled: false,
            ..service()
        };

        let summary = geocode_pending(&conn, &geocoder, &disabled, DEFAULT_LIMIT)
            .await
            .unwrap();
        assert_eq!(summary, GeocodeSummary::default());
        assert!(geocoder.seen().is_empty());
    }
}
