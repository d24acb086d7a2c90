//! Config and database path resolution.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tvprog_db::default_db_path;

use super::config::AppConfig;

/// Environment variable overriding the database path.
pub const DATABASE_ENV: &str = "TVPROG_DATABASE";

/// Resolves the config file path.
///
/// - If `dir` is `Some`, returns `{dir}/config.toml`.
/// - Otherwise returns `~/.config/tvprog/config.toml`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined (when `dir` is `None`).
pub fn resolve_config_path(dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join("config.toml"));
    }

    let home = std::env::var("HOME").context("HOME environment variable is not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("tvprog")
        .join("config.toml"))
}

/// Resolves the database file path.
///
/// First match wins: `flag`, the `TVPROG_DATABASE` value in `env`,
/// `database.path` from `config`, then the data directory default.
///
/// # Errors
///
/// Returns an error if the default location cannot be determined.
pub fn resolve_db_path(
    flag: Option<&Path>,
    env: Option<PathBuf>,
    config: &AppConfig,
    dir: Option<&Path>,
) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = env.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(path);
    }
    if let Some(path) = &config.database.path {
        return Ok(path.clone());
    }
    default_db_path(dir)
}
