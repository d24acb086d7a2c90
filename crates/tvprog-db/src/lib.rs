//! Schedule database layer.
//!
//! Uses `rusqlite` (bundled `SQLite`) to store XMLTV channels and
//! programmes, and exposes the maintenance operations run by the CLI.

/// Channel table operations.
pub mod channels;
mod connection;
mod error;
/// Bounded text field limits.
pub mod limits;
mod migrations;
/// Programme table operations.
pub mod programmes;
mod repository;
mod tables;

#[allow(clippy::module_name_repetitions)]
pub use channels::ChannelRow;
#[allow(clippy::module_name_repetitions)]
pub use connection::{default_db_path, open_db};
#[allow(clippy::module_name_repetitions)]
pub use error::{ConnectionError, UnknownTableError, is_connection_error};
pub use programmes::ProgrammeRow;
pub use repository::{ImportCounts, ScheduleRepository};
pub use tables::Table;
