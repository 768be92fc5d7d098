//! Fixed queries against the `Fires` table.
//!
//! Numeric columns are decoded by storage class rather than declared type,
//! so `INTEGER` and `REAL` values are accepted interchangeably.

use rusqlite::types::{Type, ValueRef};
use rusqlite::{Connection, Row, params};
use wildfire_api_fire_models::FireRow;

use crate::QueryError;

/// Random sample of the six base columns.
const SAMPLE_FIRES_SQL: &str = "SELECT FIRE_YEAR, DISCOVERY_DOY, CONT_DOY, FIRE_SIZE, LATITUDE, LONGITUDE
     FROM Fires
     ORDER BY RANDOM()
     LIMIT ?1";

const DISTINCT_YEARS_SQL: &str = "SELECT DISTINCT FIRE_YEAR
     FROM Fires
     WHERE FIRE_YEAR IS NOT NULL
     ORDER BY FIRE_YEAR";

/// Selects up to `limit` rows in random order.
///
/// # Errors
///
/// Returns [`QueryError::Query`] if the statement fails or a column holds
/// a non-numeric value.
pub fn sample_rows(conn: &Connection, limit: u32) -> Result<Vec<FireRow>, QueryError> {
    let mut stmt = conn.prepare(SAMPLE_FIRES_SQL)?;
    let rows = stmt
        .query_map(params![i64::from(limit)], |row| {
            Ok(FireRow {
                fire_year: int_column(row, 0)?,
                discovery_doy: int_column(row, 1)?,
                cont_doy: int_column(row, 2)?,
                fire_size: float_column(row, 3)?,
                latitude: float_column(row, 4)?,
                longitude: float_column(row, 5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Selects every distinct non-null `FIRE_YEAR`, ascending.
///
/// # Errors
///
/// Returns [`QueryError::Query`] if the statement fails.
pub fn distinct_years(conn: &Connection) -> Result<Vec<i64>, QueryError> {
    let mut stmt = conn.prepare(DISTINCT_YEARS_SQL)?;
    let years = stmt
        .query_map([], |row| int_column(row, 0))?
        .filter_map(Result::transpose)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(years)
}

/// Reads an integer column, truncating `REAL` values.
#[allow(clippy::cast_possible_truncation)]
fn int_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<i64>> {
    match row.get_ref(idx)? {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(v) => Ok(Some(v)),
        ValueRef::Real(v) => Ok(Some(v as i64)),
        other => Err(invalid_type(row, idx, other.data_type())),
    }
}

/// Reads a floating point column, widening `INTEGER` values.
#[allow(clippy::cast_precision_loss)]
fn float_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<f64>> {
    match row.get_ref(idx)? {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(v) => Ok(Some(v as f64)),
        ValueRef::Real(v) => Ok(Some(v)),
        other => Err(invalid_type(row, idx, other.data_type())),
    }
}

fn invalid_type(row: &Row<'_>, idx: usize, found: Type) -> rusqlite::Error {
    let name = row
        .as_ref()
        .column_name(idx)
        .map_or_else(|_| idx.to_string(), ToString::to_string);
    rusqlite::Error::InvalidColumnType(idx, name, found)
}
