//! Channel table operations.

use anyhow::{Context, Result};
use rusqlite::Connection;

use super::limits::{CHANNEL_ID_MAX, CHANNEL_NAME_MAX, clip};

/// A `channels` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRow {
    /// Display name.
    pub name: String,
    /// Channel identifier (unique).
    pub channel: String,
}

/// Replaces channels by identifier. Returns the number of rows processed.
///
/// Runs in a single transaction; an existing row with the same `channel`
/// is overwritten. Bounded fields are clipped before binding.
///
/// # Errors
///
/// Returns an error if the database operation fails.
#[allow(clippy::module_name_repetitions)]
pub fn replace_channels(conn: &Connection, channels: &[ChannelRow]) -> Result<usize> {
    if channels.is_empty() {
        return Ok(0);
    }

    let tx = conn
        .unchecked_transaction()
        .context("failed to begin transaction")?;

    let mut stmt = tx
        .prepare("INSERT OR REPLACE INTO channels (name, channel) VALUES (?1, ?2)")
        .context("failed to prepare channels replace")?;

    for ch in channels {
        stmt.execute(rusqlite::params![
            clip(&ch.name, CHANNEL_NAME_MAX),
            clip(&ch.channel, CHANNEL_ID_MAX),
        ])
        .with_context(|| format!("failed to replace channel {}", ch.channel))?;
    }

    drop(stmt);
    tx.commit().context("failed to commit channels")?;
    Ok(channels.len())
}

/// Loads all channels, ordered by identifier.
///
/// # Errors
///
/// Returns an error if the database query fails.
#[allow(clippy::module_name_repetitions)]
pub fn load_channels(conn: &Connection) -> Result<Vec<ChannelRow>> {
    let mut stmt = conn
        .prepare("SELECT name, channel FROM channels ORDER BY channel")
        .context("failed to prepare channels query")?;

    let rows = stmt
        .query_map([], |row| {
            Ok(ChannelRow {
                name: row.get(0)?,
                channel: row.get(1)?,
            })
        })
        .context("failed to query channels")?;

    rows.collect::<std::result::Result<Vec<_>, _>>()
        .context("failed to read channels rows")
}
