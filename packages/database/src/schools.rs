//! Queries against the `schools` and `_meta` tables.

use duckdb::Connection;
use school_map_school_models::{Coordinates, School, StateTag};

use crate::DbError;

const COLUMNS: &str = "id, name, schulform, kreis, ort, rating, lat, lng, state";

/// Which rows [`select_all`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchoolFilter {
    /// Every row.
    All,
    /// Rows still lacking coordinates.
    PendingGeocode,
    /// Rows with both coordinates set.
    Located,
}

impl SchoolFilter {
    const fn where_clause(self) -> &'static str {
        match self {
            Self::All => "",
            Self::PendingGeocode => " WHERE lat IS NULL OR lng IS NULL",
            Self::Located => " WHERE lat IS NOT NULL AND lng IS NOT NULL",
        }
    }
}

/// A `schools` row as stored, before validation.
struct SchoolRow {
    id: String,
    name: Option<String>,
    schulform: Option<String>,
    kreis: Option<String>,
    ort: Option<String>,
    rating: Option<i32>,
    lat: Option<f64>,
    lng: Option<f64>,
    state: Option<String>,
}

impl TryFrom<SchoolRow> for School {
    type Error = DbError;

    fn try_from(row: SchoolRow) -> Result<Self, Self::Error> {
        // Rows written before the state column existed are all from SH.
        let state = match row.state.as_deref() {
            None | Some("") => StateTag::Sh,
            Some(s) => s.parse().map_err(|_| DbError::Conversion {
                message: format!("unknown state tag {s:?} for school {}", row.id),
            })?,
        };

        Ok(Self {
            name: row.name.unwrap_or_default(),
            schulform: row.schulform.unwrap_or_default(),
            kreis: row.kreis.unwrap_or_default(),
            ort: row.ort.unwrap_or_default(),
            rating: row.rating.unwrap_or_default(),
            coordinates: Coordinates::from_columns(row.lat, row.lng),
            state,
            id: row.id,
        })
    }
}

/// Returns the rows matching `filter`, ordered by id.
///
/// If `limit` is `Some`, returns at most that many rows.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a row holds an unknown state
/// tag.
pub fn select_all(
    conn: &Connection,
    filter: SchoolFilter,
    limit: Option<u64>,
) -> Result<Vec<School>, DbError> {
    let limit_clause = limit.map_or_else(String::new, |n| format!(" LIMIT {n}"));
    let sql = format!(
        "SELECT {COLUMNS} FROM schools{} ORDER BY id{limit_clause}",
        filter.where_clause()
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(SchoolRow {
                id: row.get(0)?,
                name: row.get(1)?,
                schulform: row.get(2)?,
                kreis: row.get(3)?,
                ort: row.get(4)?,
                rating: row.get(5)?,
                lat: row.get(6)?,
                lng: row.get(7)?,
                state: row.get(8)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(School::try_from).collect()
}

/// Returns all located schools: the public record listing.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn list_geocoded(conn: &Connection) -> Result<Vec<School>, DbError> {
    select_all(conn, SchoolFilter::Located, None)
}

/// Returns up to `limit` schools still waiting for coordinates.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn pending_geocode(conn: &Connection, limit: Option<u64>) -> Result<Vec<School>, DbError> {
    select_all(conn, SchoolFilter::PendingGeocode, limit)
}

/// Writes geocoded coordinates for one school.
///
/// Returns the number of rows updated (0 if the id is unknown).
///
/// # Errors
///
/// Returns [`DbError`] if the update fails.
pub fn update_coordinates(
    conn: &Connection,
    id: &str,
    coordinates: Coordinates,
) -> Result<u64, DbError> {
    let rows = conn.execute(
        "UPDATE schools SET lat = ?, lng = ? WHERE id = ?",
        duckdb::params![coordinates.lat, coordinates.lng, id],
    )?;
    Ok(u64::try_from(rows).unwrap_or(0))
}

/// Geocoding coverage of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStatus {
    /// Number of stored schools.
    pub total: u64,
    /// Number of schools without coordinates.
    pub missing: u64,
}

impl StoreStatus {
    /// Percentage of located schools, `0.0` for an empty store.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.total - self.missing) as f64 / self.total as f64 * 100.0
    }
}

/// Counts all schools and those missing coordinates.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn count_status(conn: &Connection) -> Result<StoreStatus, DbError> {
    let (total, missing): (i64, i64) = conn.query_row(
        "SELECT COUNT(*), COUNT(*) FILTER (WHERE lat IS NULL OR lng IS NULL) FROM schools",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    #[allow(clippy::cast_sign_loss)]
    Ok(StoreStatus {
        total: total as u64,
        missing: missing as u64,
    })
}

/// Gets a metadata value from the `_meta` table.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn get_meta(conn: &Connection, key: &str) -> Result<Option<String>, DbError> {
    let mut stmt = conn.prepare("SELECT value FROM _meta WHERE key = ?")?;
    let result = stmt.query_row([key], |row| row.get(0));
    match result {
        Ok(v) => Ok(Some(v)),
        Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DbError::DuckDb(e)),
    }
}

/// Sets a metadata value in the `_meta` table.
///
/// # Errors
///
/// Returns [`DbError`] if the upsert fails.
pub fn set_meta(conn: &Connection, key: &str, value: &str) -> Result<(), DbError> {
    conn.execute(
        "INSERT INTO _meta (key, value) VALUES (?, ?)
         ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value",
        duckdb::params![key, value],
    )?;
    Ok(())
}

/// Records a completed import of `source_id` with `record_count` records.
///
/// # Errors
///
/// Returns [`DbError`] if the metadata update fails.
pub fn record_import(
    conn: &Connection,
    source_id: &str,
    record_count: usize,
) -> Result<(), DbError> {
    let now = chrono::Utc::now().to_rfc3339();

    set_meta(
        conn,
        &format!("{source_id}.record_count"),
        &record_count.to_string(),
    )?;
    set_meta(conn, &format!("{source_id}.last_imported_at"), &now)?;

    Ok(())
}
