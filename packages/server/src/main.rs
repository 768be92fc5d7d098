#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Wildfire API server binary.
//!
//! ```text
//! wildfire_api_server [--bind ADDR] [--port PORT] [--db-path PATH]
//!                     [--dataset-url URL] [--skip-download]
//! ```
//!
//! Flags override `BIND_ADDR`, `PORT`, `WILDFIRE_DB_PATH` and
//! `WILDFIRE_DATASET_URL`.

use std::path::PathBuf;

use clap::Parser;
use wildfire_api_server::ServerConfig;

#[derive(Debug, Parser)]
#[command(
    name = "wildfire_api_server",
    about = "Serve sampled historical wildfire records as JSON"
)]
struct Cli {
    /// Address to bind
    #[arg(long)]
    bind: Option<String>,
    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,
    /// Path of the wildfire SQLite file
    #[arg(long)]
    db_path: Option<PathBuf>,
    /// URL to download the dataset from when it is missing
    #[arg(long)]
    dataset_url: Option<String>,
    /// Serve without downloading a missing dataset
    #[arg(long)]
    skip_download: bool,
}

impl Cli {
    fn apply(self, config: ServerConfig) -> ServerConfig {
        ServerConfig {
            bind_addr: self.bind.unwrap_or(config.bind_addr),
            port: self.port.unwrap_or(config.port),
            db_path: self.db_path.unwrap_or(config.db_path),
            dataset_url: self.dataset_url.unwrap_or(config.dataset_url),
            skip_download: self.skip_download || config.skip_download,
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = Cli::parse().apply(ServerConfig::from_env());
    log::debug!("{config:?}");

    wildfire_api_server::run_server(config).await?;

    Ok(())
}
