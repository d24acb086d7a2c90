//! Programme table operations.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::Connection;

use super::limits::{PROGRAMME_CHANNEL_MAX, PROGRAMME_NAME_MAX, clip};

/// A `programmes` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgrammeRow {
    /// Title.
    pub name: String,
    /// Start date in the broadcaster's offset.
    pub date: NaiveDate,
    /// Start time of day in the broadcaster's offset.
    pub time: NaiveTime,
    /// Start as Unix epoch seconds.
    pub timestart: i64,
    /// Stop as Unix epoch seconds.
    pub timestop: i64,
    /// Channel identifier (not a foreign key).
    pub channel: String,
}

/// Replaces programmes keyed by `(name, date, time, channel)`.
/// Returns the number of rows processed.
///
/// Runs in a single transaction. Bounded fields are clipped before
/// binding, so the key is computed on clipped values.
///
/// # Errors
///
/// Returns an error if the database operation fails.
#[allow(clippy::module_name_repetitions)]
pub fn replace_programmes(conn: &Connection, programmes: &[ProgrammeRow]) -> Result<usize> {
    if programmes.is_empty() {
        return Ok(0);
    }

    let tx = conn
        .unchecked_transaction()
        .context("failed to begin transaction")?;

    let mut stmt = tx
        .prepare(
            "INSERT OR REPLACE INTO programmes (
                name, date, time, timestart, timestop, channel
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .context("failed to prepare programmes replace")?;

    for p in programmes {
        stmt.execute(rusqlite::params![
            clip(&p.name, PROGRAMME_NAME_MAX),
            p.date,
            p.time,
            p.timestart,
            p.timestop,
            clip(&p.channel, PROGRAMME_CHANNEL_MAX),
        ])
        .with_context(|| {
            format!(
                "failed to replace programme {:?} on {} at {} {}",
                p.name, p.channel, p.date, p.time
            )
        })?;
    }

    drop(stmt);
    tx.commit().context("failed to commit programmes")?;
    Ok(programmes.len())
}

/// Deletes programmes dated on or before `cutoff`. Returns rows deleted.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn delete_programmes_until(conn: &Connection, cutoff: NaiveDate) -> Result<usize> {
    conn.execute("DELETE FROM programmes WHERE date <= ?1", [cutoff])
        .with_context(|| format!("failed to delete programmes dated on or before {cutoff}"))
}

/// Loads all programmes, ordered by start time, channel and title.
///
/// # Errors
///
/// Returns an error if the database query fails.
#[allow(clippy::module_name_repetitions)]
pub fn load_programmes(conn: &Connection) -> Result<Vec<ProgrammeRow>> {
    let mut stmt = conn
        .prepare(
            "SELECT name, date, time, timestart, timestop, channel
             FROM programmes
             ORDER BY timestart, channel, name",
        )
        .context("failed to prepare programmes query")?;

    let rows = stmt
        .query_map([], map_programme_row)
        .context("failed to query programmes")?;

    rows.collect::<std::result::Result<Vec<_>, _>>()
        .context("failed to read programmes rows")
}

/// Maps a database row to a `ProgrammeRow`.
fn map_programme_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProgrammeRow> {
    Ok(ProgrammeRow {
        name: row.get(0)?,
        date: row.get(1)?,
        time: row.get(2)?,
        timestart: row.get(3)?,
        timestop: row.get(4)?,
        channel: row.get(5)?,
    })
}
