//! Application configuration module.
//!
//! Manages the TOML config file and resolves where the schedule
//! database lives.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
pub use paths::{DATABASE_ENV, resolve_config_path, resolve_db_path};
