#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! First-run provisioning of the wildfire dataset.
//!
//! The `SQLite` store is large (hundreds of MB), so it is not shipped with
//! the server. On startup [`ensure_dataset_available`] checks for the file
//! and, if it is missing, streams it from [`DEFAULT_DATASET_URL`].
//!
//! Downloads are written to a sibling `.part` file and renamed into place
//! only once the whole body has been written, so an interrupted download is
//! never picked up as a valid store on the next run.

use std::path::{Path, PathBuf};

use futures::StreamExt as _;
use tokio::io::AsyncWriteExt as _;

/// Default URL of the FPA FOD wildfire `SQLite` file.
pub const DEFAULT_DATASET_URL: &str =
    "https://huggingface.co/datasets/aj0818/wildfire/resolve/main/FPA_FOD_20170508.sqlite";

const USER_AGENT: &str = concat!("wildfire-api/", env!("CARGO_PKG_VERSION"));

/// Log a progress line every this many bytes.
const PROGRESS_INTERVAL_BYTES: u64 = 100 * 1_048_576;

/// Outcome of [`ensure_dataset_available`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provisioned {
    /// The file was already on disk; nothing was fetched.
    AlreadyPresent,
    /// The file was downloaded.
    Downloaded {
        /// Number of bytes written.
        bytes: u64,
    },
}

/// Errors from download operations.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// The request could not be sent or the body stream broke off.
    #[error("Dataset request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Dataset server returned {status} for {url}")]
    Status {
        /// Request URL.
        url: String,
        /// Response status.
        status: reqwest::StatusCode,
    },

    /// Writing the dataset to disk failed.
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        /// File or directory being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Periodic progress reporting for a streamed body.
#[derive(Debug)]
struct DownloadProgress {
    total: Option<u64>,
    downloaded: u64,
    reported_intervals: u64,
}

impl DownloadProgress {
    fn new(total: Option<u64>) -> Self {
        if let Some(total) = total {
            log::info!("  file size: {:.1} MB", megabytes(total));
        }

        Self {
            total,
            downloaded: 0,
            reported_intervals: 0,
        }
    }

    /// Records `bytes` more bytes; logs once per [`PROGRESS_INTERVAL_BYTES`].
    ///
    /// Returns whether a progress line was logged.
    #[allow(clippy::cast_precision_loss)]
    fn record(&mut self, bytes: u64) -> bool {
        self.downloaded += bytes;

        let intervals = self.downloaded / PROGRESS_INTERVAL_BYTES;
        if intervals <= self.reported_intervals {
            return false;
        }
        self.reported_intervals = intervals;

        let mb = megabytes(self.downloaded);
        match self.total.filter(|&t| t > 0) {
            Some(total) => {
                let pct = self.downloaded as f64 / total as f64 * 100.0;
                log::info!("  downloaded {mb:.0} MB ({pct:.0}%)");
            }
            None => log::info!("  downloaded {mb:.0} MB"),
        }

        true
    }
}

#[allow(clippy::cast_precision_loss)]
fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / 1_048_576.0
}

/// Whether a regular file exists at `path`.
///
/// A directory or anything else occupying the path does not count.
pub async fn dataset_present(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|meta| meta.is_file())
}

/// Makes sure the dataset exists at `path`, downloading it from `url` if
/// it does not.
///
/// # Errors
///
/// Returns [`DownloadError`] if the file is missing and could not be
/// downloaded. No file is left at `path` in that case.
pub async fn ensure_dataset_available(
    path: &Path,
    url: &str,
) -> Result<Provisioned, DownloadError> {
    if dataset_present(path).await {
        log::debug!("Dataset already present at {}", path.display());
        return Ok(Provisioned::AlreadyPresent);
    }

    log::info!("Dataset not found at {}, downloading", path.display());
    let bytes = download_file(url, path).await?;

    Ok(Provisioned::Downloaded { bytes })
}

/// Downloads `url` to `dest`, streaming the body to disk.
///
/// The body goes to `<dest>.part` first and is renamed onto `dest` after
/// it has been fully written and flushed. On any failure the partial file
/// is removed.
///
/// # Errors
///
/// Returns an error if the HTTP request fails, the response is not
/// successful, the stream is interrupted, or the local file cannot be
/// written.
pub async fn download_file(url: &str, dest: &Path) -> Result<u64, DownloadError> {
    log::info!("Downloading {url}");
    log::info!("  -> {}", dest.display());

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| write_error(parent, e))?;
    }

    let part = part_path(dest);

    match stream_to_file(url, &part).await {
        Ok(downloaded) => {
            tokio::fs::rename(&part, dest)
                .await
                .map_err(|e| write_error(dest, e))?;

            log::info!("  download complete: {:.1} MB", megabytes(downloaded));

            Ok(downloaded)
        }
        Err(e) => {
            match tokio::fs::remove_file(&part).await {
                Ok(()) => log::debug!("Removed partial download {}", part.display()),
                Err(remove_err) if remove_err.kind() == std::io::ErrorKind::NotFound => {}
                Err(remove_err) => {
                    log::warn!("Failed to remove {}: {remove_err}", part.display());
                }
            }
            Err(e)
        }
    }
}

/// Fetches `url` and writes the body to `dest` chunk by chunk.
async fn stream_to_file(url: &str, dest: &Path) -> Result<u64, DownloadError> {
    let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::Status {
            url: url.to_string(),
            status,
        });
    }

    let mut progress = DownloadProgress::new(response.content_length());
    let mut file = tokio::fs::File::create(dest)
        .await
        .map_err(|e| write_error(dest, e))?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)
            .await
            .map_err(|e| write_error(dest, e))?;
        progress.record(chunk.len() as u64);
    }

    file.flush().await.map_err(|e| write_error(dest, e))?;
    file.sync_all().await.map_err(|e| write_error(dest, e))?;

    Ok(progress.downloaded)
}

/// Temporary path a download is written to before being renamed.
#[must_use]
pub fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

fn write_error(path: &Path, source: std::io::Error) -> DownloadError {
    DownloadError::Write {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use actix_web::dev::ServerHandle;
    use actix_web::{App, HttpResponse, HttpServer, web};

    use super::*;

    const BODY_LEN: usize = 64 * 1024 + 17;

    fn body() -> Vec<u8> {
        (0..BODY_LEN).map(|i| (i % 251) as u8).collect()
    }

    fn temp_dest(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "wildfire_api_provision_{name}_{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir.join("fires.sqlite")
    }

    /// Serves `/fires.sqlite` with a fixed body and `/missing` with a 404.
    fn start_server() -> (SocketAddr, ServerHandle) {
        let server = HttpServer::new(|| {
            App::new()
                .route(
                    "/fires.sqlite",
                    web::get().to(|| async { HttpResponse::Ok().body(body()) }),
                )
                .route(
                    "/missing",
                    web::get().to(|| async { HttpResponse::NotFound().finish() }),
                )
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();

        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        (addr, handle)
    }

    #[test]
    fn part_path_appends_suffix() {
        assert_eq!(
            part_path(Path::new("data/fires.sqlite")),
            PathBuf::from("data/fires.sqlite.part")
        );
        assert_eq!(
            part_path(Path::new("fires.sqlite")),
            PathBuf::from("fires.sqlite.part")
        );
    }

    #[tokio::test]
    async fn existing_file_is_left_untouched() {
        let dest = temp_dest("existing");
        std::fs::create_dir_all(dest.parent().unwrap()).unwrap();
        std::fs::write(&dest, b"already here").unwrap();

        // Port 1 is never listened on; any network access would fail.
        let result = ensure_dataset_available(&dest, "http://127.0.0.1:1/fires.sqlite")
            .await
            .unwrap();

        assert_eq!(result, Provisioned::AlreadyPresent);
        assert_eq!(std::fs::read(&dest).unwrap(), b"already here");

        let _ = std::fs::remove_dir_all(dest.parent().unwrap());
    }

    #[test]
    fn progress_logs_once_per_interval() {
        let mut progress = DownloadProgress::new(Some(3 * PROGRESS_INTERVAL_BYTES));

        assert!(!progress.record(PROGRESS_INTERVAL_BYTES - 1));
        assert!(progress.record(1));
        assert!(!progress.record(10));
        assert!(progress.record(2 * PROGRESS_INTERVAL_BYTES));
        assert_eq!(progress.downloaded, 3 * PROGRESS_INTERVAL_BYTES + 10);
    }

    #[test]
    fn progress_without_total_still_counts() {
        let mut progress = DownloadProgress::new(None);
        assert!(progress.record(PROGRESS_INTERVAL_BYTES));
        assert_eq!(progress.downloaded, PROGRESS_INTERVAL_BYTES);
    }

    #[tokio::test]
    async fn directory_at_dataset_path_is_not_present() {
        let dest = temp_dest("directory");
        std::fs::create_dir_all(&dest).unwrap();

        assert!(!dataset_present(&dest).await);

        // The download is attempted instead of being skipped.
        let err = ensure_dataset_available(&dest, "http://127.0.0.1:1/fires.sqlite")
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::Request(_)));
        assert!(!part_path(&dest).exists());

        let _ = std::fs::remove_dir_all(dest.parent().unwrap());
    }

    #[tokio::test]
    async fn unreachable_host_leaves_no_file() {
        let dest = temp_dest("unreachable");

        let err = ensure_dataset_available(&dest, "http://127.0.0.1:1/fires.sqlite")
            .await
            .unwrap_err();

        assert!(matches!(err, DownloadError::Request(_)));
        assert!(!dest.exists());
        assert!(!part_path(&dest).exists());

        let _ = std::fs::remove_dir_all(dest.parent().unwrap());
    }

    #[actix_web::test]
    async fn downloads_missing_file() {
        let (addr, handle) = start_server();
        let dest = temp_dest("download");

        let result = ensure_dataset_available(&dest, &format!("http://{addr}/fires.sqlite"))
            .await
            .unwrap();

        assert_eq!(
            result,
            Provisioned::Downloaded {
                bytes: BODY_LEN as u64
            }
        );
        assert_eq!(std::fs::read(&dest).unwrap(), body());
        assert!(!part_path(&dest).exists());

        handle.stop(true).await;
        let _ = std::fs::remove_dir_all(dest.parent().unwrap());
    }

    #[actix_web::test]
    async fn error_status_leaves_no_file() {
        let (addr, handle) = start_server();
        let dest = temp_dest("status");

        let err = ensure_dataset_available(&dest, &format!("http://{addr}/missing"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DownloadError::Status {
                status: reqwest::StatusCode::NOT_FOUND,
                ..
            }
        ));
        assert!(!dest.exists());
        assert!(!part_path(&dest).exists());

        handle.stop(true).await;
        let _ = std::fs::remove_dir_all(dest.parent().unwrap());
    }
}
