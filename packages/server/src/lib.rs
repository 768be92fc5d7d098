#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the wildfire dataset.
//!
//! Serves random samples of historical US wildfires and the list of years
//! covered, read from the FPA FOD `SQLite` file. The file is downloaded on
//! first start if it is not already on disk.

pub mod config;
mod handlers;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use wildfire_api_database::FireStore;
use wildfire_api_provision::{DownloadError, Provisioned, ensure_dataset_available};

pub use config::ServerConfig;

/// Shared application state.
pub struct AppState {
    /// Wildfire store. Each request opens its own connection.
    pub store: FireStore,
}

/// Errors that stop the server from starting or running.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The dataset could not be provisioned.
    #[error("Failed to provision wildfire dataset: {0}")]
    Download(#[from] DownloadError),

    /// Binding or serving failed.
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ServerError> for std::io::Error {
    fn from(e: ServerError) -> Self {
        match e {
            ServerError::Io(e) => e,
            e @ ServerError::Download(_) => Self::other(e),
        }
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/wildfires", web::get().to(handlers::wildfires))
            .route("/years", web::get().to(handlers::years))
            .route("/health", web::get().to(handlers::health)),
    );
}

/// Starts the wildfire API server.
///
/// Provisions the dataset (unless `skip_download` is set), then binds and
/// serves until the process is terminated.
///
/// # Errors
///
/// * [`ServerError::Download`] if the dataset is missing and cannot be
///   downloaded
/// * [`ServerError::Io`] if the server fails to bind or run
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    if config.skip_download {
        log::warn!("Skipping dataset provisioning");
    } else {
        match ensure_dataset_available(&config.db_path, &config.dataset_url).await? {
            Provisioned::AlreadyPresent => {
                log::info!("Using wildfire dataset at {}", config.db_path.display());
            }
            Provisioned::Downloaded { bytes } => {
                log::info!(
                    "Downloaded wildfire dataset to {} ({bytes} bytes)",
                    config.db_path.display()
                );
            }
        }
    }

    let state = web::Data::new(AppState {
        store: FireStore::new(config.db_path.clone()),
    });

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);
    log::info!("API endpoints:");
    log::info!("  - GET /api/wildfires?limit=3000");
    log::info!("  - GET /api/years");
    log::info!("  - GET /api/health");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_pass_through_unchanged() {
        let err = std::io::Error::from(ServerError::Io(std::io::Error::new(
            std::io::ErrorKind::AddrInUse,
            "port taken",
        )));
        assert_eq!(err.kind(), std::io::ErrorKind::AddrInUse);
        assert_eq!(err.to_string(), "port taken");
    }

    #[test]
    fn download_errors_become_other_io_errors() {
        let err = std::io::Error::from(ServerError::Download(DownloadError::Write {
            path: std::path::PathBuf::from("fires.sqlite"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        }));
        assert_eq!(err.kind(), std::io::ErrorKind::Other);
        assert!(err.to_string().contains("denied"));
    }
}
