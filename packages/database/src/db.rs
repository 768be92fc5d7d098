//! Store connection utilities.

use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use crate::QueryError;

/// Opens a read-only connection to the `SQLite` file at `path`.
///
/// The file is never created: opening a missing path fails instead of
/// leaving an empty database behind.
///
/// # Errors
///
/// Returns [`QueryError::Open`] if `SQLite` cannot open the file.
pub fn open_read_only(path: &Path) -> Result<Connection, QueryError> {
    log::trace!("Opening wildfire database at {}", path.display());

    Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|e| {
        log::error!("Failed to open {}: {e}", path.display());
        QueryError::Open(e)
    })
}
