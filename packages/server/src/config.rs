//! Server configuration.
//!
//! Values come from defaults, then environment variables, then command-line
//! flags (applied by the binary).

use std::path::PathBuf;

use wildfire_api_database::DEFAULT_DB_PATH;
use wildfire_api_provision::DEFAULT_DATASET_URL;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 5000;

/// Default bind address.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";

/// Runtime configuration for [`crate::run_server`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind (`BIND_ADDR`).
    pub bind_addr: String,
    /// Port to listen on (`PORT`).
    pub port: u16,
    /// Path of the wildfire `SQLite` store (`WILDFIRE_DB_PATH`).
    pub db_path: PathBuf,
    /// Where to fetch the store from when it is missing
    /// (`WILDFIRE_DATASET_URL`).
    pub dataset_url: String,
    /// Start serving without provisioning the store.
    pub skip_download: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            dataset_url: DEFAULT_DATASET_URL.to_string(),
            skip_download: false,
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Unset or empty variables keep their defaults. An unparseable `PORT`
    /// falls back to [`DEFAULT_PORT`].
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match var("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("Ignoring invalid PORT {raw:?}, using {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
            None => defaults.port,
        };

        Self {
            bind_addr: var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port,
            db_path: var("WILDFIRE_DB_PATH").map_or(defaults.db_path, PathBuf::from),
            dataset_url: var("WILDFIRE_DATASET_URL").unwrap_or(defaults.dataset_url),
            skip_download: defaults.skip_download,
        }
    }
}
