//! Merging freshly extracted records into the store.
//!
//! Records are matched by id. A new id is inserted pending geocode. An
//! existing id has its mutable fields overwritten; its coordinates are kept
//! when the Ort is unchanged and cleared otherwise, so the geocoder picks
//! the school up again on its next run. Stored rows whose id is missing from
//! the batch are left alone.

use std::collections::BTreeMap;

use duckdb::Connection;
use school_map_school_models::{Coordinates, School};

use crate::DbError;
use crate::schools::{SchoolFilter, select_all};

/// What reconciliation did to one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// First sighting of the id.
    Inserted,
    /// Known id, Ort unchanged; stored coordinates carried over.
    Retained(Option<Coordinates>),
    /// Known id, Ort changed; coordinates cleared.
    Reset,
}

impl Outcome {
    /// Coordinates to write for this record.
    #[must_use]
    pub const fn coordinates(self) -> Option<Coordinates> {
        match self {
            Self::Retained(coordinates) => coordinates,
            Self::Inserted | Self::Reset => None,
        }
    }
}

/// Counts reported by [`reconcile`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Ids seen for the first time.
    pub inserted: u64,
    /// Known ids whose Ort changed; now pending geocode.
    pub reset: u64,
    /// Known ids whose Ort was unchanged.
    pub retained: u64,
}

impl ReconcileSummary {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Inserted => self.inserted += 1,
            Outcome::Retained(_) => self.retained += 1,
            Outcome::Reset => self.reset += 1,
        }
    }
}

/// Decides the fate of `incoming` given the stored row with the same id.
#[must_use]
pub fn decide(existing: Option<&School>, incoming: &School) -> Outcome {
    match existing {
        None => Outcome::Inserted,
        Some(old) if old.ort == incoming.ort => Outcome::Retained(old.coordinates),
        Some(old) => {
            log::debug!(
                "Ort changed for {}: {:?} -> {:?}",
                incoming.id,
                old.ort,
                incoming.ort
            );
            Outcome::Reset
        }
    }
}

/// Keeps the last occurrence of every id, preserving first-seen order.
fn dedupe_last(schools: &[School]) -> Vec<&School> {
    let mut last_seen: BTreeMap<&str, usize> = BTreeMap::new();
    for (i, school) in schools.iter().enumerate() {
        last_seen.insert(&school.id, i);
    }

    let deduped: Vec<&School> = schools
        .iter()
        .enumerate()
        .filter(|(i, school)| last_seen.get(school.id.as_str()) == Some(i))
        .map(|(_, school)| school)
        .collect();

    if deduped.len() < schools.len() {
        log::info!(
            "Deduplicated batch: {} -> {} records ({} duplicates removed)",
            schools.len(),
            deduped.len(),
            schools.len() - deduped.len(),
        );
    }

    deduped
}

/// Merges `schools` into the store in a single transaction.
///
/// Either every insert and update is committed or, on any error, none is:
/// the transaction is rolled back when it is dropped uncommitted.
///
/// # Errors
///
/// Returns [`DbError`] if reading the current state or writing any record
/// fails.
pub fn reconcile(
    conn: &mut Connection,
    schools: &[School],
) -> Result<ReconcileSummary, DbError> {
    let batch = dedupe_last(schools);
    let tx = conn.transaction()?;

    let existing: BTreeMap<String, School> = select_all(&tx, SchoolFilter::All, None)?
        .into_iter()
        .map(|school| (school.id.clone(), school))
        .collect();

    let mut summary = ReconcileSummary::default();

    {
        let mut stmt = tx.prepare(
            "INSERT INTO schools (id, name, schulform, kreis, ort, rating, lat, lng, state)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                schulform = EXCLUDED.schulform,
                kreis = EXCLUDED.kreis,
                ort = EXCLUDED.ort,
                rating = EXCLUDED.rating,
                lat = EXCLUDED.lat,
                lng = EXCLUDED.lng,
                state = EXCLUDED.state",
        )?;

        for school in batch {
            let outcome = decide(existing.get(&school.id), school);
            let coordinates = outcome.coordinates();

            stmt.execute(duckdb::params![
                school.id,
                school.name,
                school.schulform,
                school.kreis,
                school.ort,
                school.rating,
                coordinates.map(|c| c.lat),
                coordinates.map(|c| c.lng),
                school.state.as_ref(),
            ])?;

            summary.record(outcome);
        }
    }

    tx.commit()?;

    log::info!(
        "Data updated. Resets (re-geocode needed): {}. New: {}. Unchanged location: {}.",
        summary.reset,
        summary.inserted,
        summary.retained
    );

    Ok(summary)
}
