//! Database connection management.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::Connection;

use super::error::ConnectionError;

/// Database file name used inside data directories.
const DB_FILE_NAME: &str = "tvprog.db";

/// Opens (or creates) the database file at `path`.
///
/// The parent directory is created when missing, and the file header is
/// read once so that an unusable file fails here rather than at the first
/// operation. The schema is not touched; see
/// [`ScheduleRepository::create_schema`](crate::ScheduleRepository::create_schema).
///
/// # Errors
///
/// Returns [`ConnectionError`] if the directory cannot be created, the file
/// cannot be opened, or it is not an `SQLite` database.
pub fn open_db(path: &Path) -> Result<Connection, ConnectionError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ConnectionError::Directory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let open_error = |source| ConnectionError::Open {
        path: path.to_path_buf(),
        source,
    };

    let conn = Connection::open(path).map_err(open_error)?;
    conn.pragma_query_value(None, "schema_version", |row| row.get::<_, i64>(0))
        .map_err(open_error)?;

    tracing::debug!(path = %path.display(), "database opened");
    Ok(conn)
}

/// Resolves the default database file path.
///
/// - If `dir` is `Some`, uses `{dir}/tvprog.db`.
/// - Otherwise uses `~/.local/share/tvprog/tvprog.db`.
///
/// # Errors
///
/// Returns an error if `HOME` is not set and no `dir` is given.
pub fn default_db_path(dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(DB_FILE_NAME));
    }

    let home = std::env::var("HOME").context("HOME environment variable is not set")?;
    Ok(PathBuf::from(home)
        .join(".local")
        .join("share")
        .join("tvprog")
        .join(DB_FILE_NAME))
}
