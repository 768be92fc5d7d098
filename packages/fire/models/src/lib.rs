#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Wildfire record types.
//!
//! [`FireRow`] is the shape of a row as read from the `Fires` table, where
//! every column may be `NULL`. [`FireRecord`] is the shape returned by the
//! API: it always carries a location and the derived days-to-containment
//! column. Column names are serialized exactly as they appear in the source
//! table (`FIRE_YEAR`, `DISCOVERY_DOY`, ...).

use serde::{Deserialize, Serialize};

/// A wildfire row as stored in the `Fires` table.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FireRow {
    /// Calendar year the fire was discovered.
    pub fire_year: Option<i64>,
    /// Day of year (1-366) the fire was discovered.
    pub discovery_doy: Option<i64>,
    /// Day of year the fire was contained.
    pub cont_doy: Option<i64>,
    /// Final burned area.
    pub fire_size: Option<f64>,
    /// Latitude of the point of origin.
    pub latitude: Option<f64>,
    /// Longitude of the point of origin.
    pub longitude: Option<f64>,
}

impl FireRow {
    /// Days between discovery and containment.
    ///
    /// `None` when either day is missing. Negative values (containment in
    /// the following calendar year) are passed through as-is.
    #[must_use]
    pub fn day_to_cont(&self) -> Option<i64> {
        self.cont_doy?.checked_sub(self.discovery_doy?)
    }

    /// Converts the row into an API record.
    ///
    /// Returns `None` if the row has no latitude or no longitude.
    #[must_use]
    pub fn into_record(self) -> Option<FireRecord> {
        let day_to_cont = self.day_to_cont();

        Some(FireRecord {
            fire_year: self.fire_year,
            discovery_doy: self.discovery_doy,
            cont_doy: self.cont_doy,
            fire_size: self.fire_size,
            latitude: self.latitude?,
            longitude: self.longitude?,
            day_to_cont,
        })
    }
}

/// A located wildfire as returned by the sampling endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct FireRecord {
    /// Calendar year the fire was discovered.
    pub fire_year: Option<i64>,
    /// Day of year (1-366) the fire was discovered.
    pub discovery_doy: Option<i64>,
    /// Day of year the fire was contained.
    pub cont_doy: Option<i64>,
    /// Final burned area.
    pub fire_size: Option<f64>,
    /// Latitude of the point of origin.
    pub latitude: f64,
    /// Longitude of the point of origin.
    pub longitude: f64,
    /// `CONT_DOY - DISCOVERY_DOY`.
    pub day_to_cont: Option<i64>,
}

/// Converts store rows into API records, dropping rows without a location.
///
/// Surviving rows keep their relative order.
pub fn located_records(rows: impl IntoIterator<Item = FireRow>) -> Vec<FireRecord> {
    rows.into_iter().filter_map(FireRow::into_record).collect()
}
