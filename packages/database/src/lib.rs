#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Read-only access to the wildfire `SQLite` store.
//!
//! [`FireStore`] owns nothing but the path to the store file. Every
//! operation opens its own read-only connection through
//! [`FireStore::with_connection`] and releases it before returning, so no
//! handle outlives a request, including on error paths.

pub mod db;
pub mod queries;

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use wildfire_api_fire_models::{FireRecord, located_records};

/// Default path of the store file, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "FPA_FOD_20170508.sqlite";

/// Errors that can occur while reading the store.
///
/// Messages are safe to return to API clients: they never include the
/// filesystem path of the store.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The store file does not exist.
    #[error("Wildfire database not found")]
    StoreMissing,

    /// `SQLite` refused to open the store file.
    #[error("Failed to open wildfire database")]
    Open(#[source] rusqlite::Error),

    /// Statement preparation, execution, or row decoding failed.
    #[error("Database query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

/// Handle to the wildfire store file.
#[derive(Debug, Clone)]
pub struct FireStore {
    path: PathBuf,
}

impl FireStore {
    /// Creates a store handle for the file at `path`.
    ///
    /// Does not touch the filesystem.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the store file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the store file currently exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Opens a read-only connection, runs `f` with it, and closes it.
    ///
    /// # Errors
    ///
    /// * [`QueryError::StoreMissing`] if the store file does not exist
    /// * [`QueryError::Open`] if `SQLite` cannot open the file
    /// * whatever `f` returns
    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, QueryError>,
    ) -> Result<T, QueryError> {
        if !self.exists() {
            log::warn!("Wildfire database missing at {}", self.path.display());
            return Err(QueryError::StoreMissing);
        }

        let conn = db::open_read_only(&self.path)?;
        f(&conn)
    }

    /// Returns a random sample of at most `limit` located fires.
    ///
    /// Rows without a latitude or longitude are dropped after sampling, so
    /// fewer than `limit` records may be returned. Results differ between
    /// calls.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] if the store cannot be opened or queried.
    pub fn sample_fires(&self, limit: u32) -> Result<Vec<FireRecord>, QueryError> {
        let rows = self.with_connection(|conn| queries::sample_rows(conn, limit))?;
        let sampled = rows.len();
        let records = located_records(rows);

        log::debug!(
            "Sampled {sampled} fires (limit {limit}), {} with a location",
            records.len()
        );

        Ok(records)
    }

    /// Returns every distinct discovery year, ascending.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] if the store cannot be opened or queried.
    pub fn distinct_years(&self) -> Result<Vec<i64>, QueryError> {
        self.with_connection(queries::distinct_years)
    }
}
