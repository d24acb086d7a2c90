//! Error types shared by the database layer.

use std::path::PathBuf;

use rusqlite::ErrorCode;
use thiserror::Error;

/// The database could not be reached.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The parent directory of the database file could not be created.
    #[error("failed to create database directory {}", .path.display())]
    Directory {
        /// Directory path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// `SQLite` refused to open the file or it is not a database.
    #[error("failed to open database {}", .path.display())]
    Open {
        /// Database file path.
        path: PathBuf,
        /// Underlying `SQLite` error.
        #[source]
        source: rusqlite::Error,
    },
}

/// A table name outside the truncation allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown table {name:?} (expected one of: channels, programmes)")]
pub struct UnknownTableError {
    /// Rejected name.
    pub name: String,
}

/// Returns `true` if any cause in `err` means the database is unreachable
/// or refuses access, as opposed to a data or schema problem.
#[must_use]
pub fn is_connection_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause.is::<ConnectionError>()
            || cause
                .downcast_ref::<rusqlite::Error>()
                .is_some_and(is_unavailable)
    })
}

fn is_unavailable(err: &rusqlite::Error) -> bool {
    matches!(
        err.sqlite_error_code(),
        Some(
            ErrorCode::CannotOpen
                | ErrorCode::NotADatabase
                | ErrorCode::PermissionDenied
                | ErrorCode::ReadOnly
                | ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::AuthorizationForStatementDenied
                | ErrorCode::SystemIoFailure
        )
    )
}
