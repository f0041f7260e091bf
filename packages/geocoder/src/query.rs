//! Free-form query strategies for locating a school.
//!
//! Report names are often long ("Grundschule am Markt, Außenstelle ...")
//! and Nominatim only matches a fraction of them verbatim. Each school is
//! therefore tried with progressively less specific queries, ending with
//! the Ort centroid as a last resort.

use school_map_school_models::{School, UNKNOWN_SCHULFORM};

use crate::service_registry::NominatimService;

/// Joins the non-empty parts with `", "`.
fn join_parts(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds the ordered, de-duplicated list of queries for `school`.
///
/// 1. full name, Ort, Kreis
/// 2. name up to the first comma, Ort, Kreis
/// 3. name up to the first comma, Ort
/// 4. school form and Ort, Kreis (skipped for unknown school forms)
/// 5. Ort, Kreis
#[must_use]
pub fn query_strategies(school: &School, service: &NominatimService) -> Vec<String> {
    let kreis = service.region_alias(&school.kreis);
    let country = service.country_suffix.as_str();
    let ort = school.ort.as_str();
    let short_name = school.name.split(',').next().unwrap_or_default().trim();

    let mut candidates = vec![
        join_parts(&[&school.name, ort, kreis, country]),
        join_parts(&[short_name, ort, kreis, country]),
        join_parts(&[short_name, ort, country]),
    ];

    if school.schulform != UNKNOWN_SCHULFORM && !school.schulform.is_empty() {
        let form_and_ort = format!("{} {ort}", school.schulform);
        candidates.push(join_parts(&[&form_and_ort, kreis, country]));
    }

    candidates.push(join_parts(&[ort, kreis, country]));

    let mut queries: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if candidate != country && !queries.contains(&candidate) {
            queries.push(candidate);
        }
    }
    queries
}
