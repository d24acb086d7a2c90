//! Schedule repository: the operations the CLI dispatches to.

use std::num::NonZeroU32;

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use rusqlite::Connection;
use tracing::instrument;

use super::channels::{ChannelRow, load_channels, replace_channels};
use super::migrations::run_migrations;
use super::programmes::{ProgrammeRow, delete_programmes_until, load_programmes, replace_programmes};
use super::tables::Table;

/// Rows processed by an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportCounts {
    /// Channels written.
    pub channels: usize,
    /// Programmes written.
    pub programmes: usize,
}

/// Data access for the `channels` and `programmes` tables over a
/// caller-provided connection.
#[derive(Debug)]
pub struct ScheduleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> ScheduleRepository<'conn> {
    /// Wraps an open connection.
    #[must_use]
    pub const fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Creates both tables and their indexes if absent. Safe to repeat.
    ///
    /// # Errors
    ///
    /// Returns an error if a migration statement fails.
    #[instrument(skip_all)]
    pub fn create_schema(&self) -> Result<()> {
        run_migrations(self.conn).context("failed to create schema")
    }

    /// Replaces channels, then programmes, each table in its own
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if either replace fails. Channels are already
    /// committed when the programme step fails.
    #[instrument(skip_all, fields(channels = channels.len(), programmes = programmes.len()))]
    pub fn import(
        &self,
        channels: &[ChannelRow],
        programmes: &[ProgrammeRow],
    ) -> Result<ImportCounts> {
        let channels = replace_channels(self.conn, channels).context("failed to import channels")?;
        tracing::debug!(channels, "channels replaced");

        let programmes =
            replace_programmes(self.conn, programmes).context("failed to import programmes")?;
        tracing::debug!(programmes, "programmes replaced");

        Ok(ImportCounts {
            channels,
            programmes,
        })
    }

    /// Deletes every row of each table. Returns the number of tables
    /// truncated.
    ///
    /// # Errors
    ///
    /// Returns an error if a delete fails; earlier tables stay truncated.
    #[instrument(skip_all)]
    pub fn truncate(&self, tables: &[Table]) -> Result<usize> {
        for table in tables {
            let deleted = self
                .conn
                .execute(table.delete_all_sql(), [])
                .with_context(|| format!("failed to truncate {table}"))?;
            tracing::debug!(%table, deleted, "table truncated");
        }
        Ok(tables.len())
    }

    /// Deletes programmes dated `days` or more days before `today`.
    /// Returns rows deleted. Channels are not touched.
    ///
    /// # Errors
    ///
    /// Returns an error if the cutoff date underflows or the delete fails.
    #[instrument(skip(self))]
    pub fn delete_older_than(&self, days: NonZeroU32, today: NaiveDate) -> Result<usize> {
        let cutoff = cutoff_date(today, days)?;
        tracing::debug!(%cutoff, "deleting programmes on or before cutoff");
        delete_programmes_until(self.conn, cutoff)
    }

    /// Loads all channels ordered by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn load_channels(&self) -> Result<Vec<ChannelRow>> {
        load_channels(self.conn)
    }

    /// Loads all programmes ordered by start time.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn load_programmes(&self) -> Result<Vec<ProgrammeRow>> {
        load_programmes(self.conn)
    }
}

/// `today - days`.
fn cutoff_date(today: NaiveDate, days: NonZeroU32) -> Result<NaiveDate> {
    today
        .checked_sub_days(Days::new(u64::from(days.get())))
        .with_context(|| format!("{days} days before {today} is out of range"))
}
