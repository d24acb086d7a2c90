//! Schema version management using `PRAGMA user_version`.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Current schema version.
const CURRENT_VERSION: u32 = 2;

/// Runs database migrations up to `CURRENT_VERSION`.
///
/// # Errors
///
/// Returns an error if any SQL statement fails.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let version: u32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .context("failed to read user_version")?;

    if version < 1 {
        migrate_v1(conn).context("migration to v1 failed")?;
    }
    if version < 2 {
        migrate_v2(conn).context("migration to v2 failed")?;
    }

    conn.pragma_update(None, "user_version", CURRENT_VERSION)
        .context("failed to update user_version")?;

    tracing::debug!(from = version, to = CURRENT_VERSION, "schema up to date");
    Ok(())
}

/// Migration to v1: create `channels` and `programmes` tables.
fn migrate_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS channels (
            id       INTEGER PRIMARY KEY,
            name     TEXT NOT NULL,
            channel  TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS programmes (
            id         INTEGER PRIMARY KEY,
            name       TEXT NOT NULL,
            date       TEXT NOT NULL,
            time       TEXT NOT NULL,
            timestart  INTEGER NOT NULL,
            timestop   INTEGER NOT NULL,
            channel    TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_programmes_name_date_time_channel
            ON programmes(name, date, time, channel);",
    )
    .context("failed to create tables")?;

    Ok(())
}

/// Migration to v2: index `programmes.date` for age-based deletion.
fn migrate_v2(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE INDEX IF NOT EXISTS idx_programmes_date ON programmes(date);")
        .context("failed to create programmes date index")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn object_names(conn: &Connection, kind: &str) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = ?1 ORDER BY name")
            .unwrap();
        let rows = stmt.query_map([kind], |row| row.get(0)).unwrap();
        rows.map(|r| r.unwrap()).collect()
    }

    #[test]
    fn test_migrations_idempotent() {
        // Arrange
        let conn = Connection::open_in_memory().unwrap();

        // Act
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        // Assert
        let version: u32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert_eq!(version, CURRENT_VERSION);
    }

    #[test]
    fn test_tables_exist_after_migration() {
        // Arrange
        let conn = Connection::open_in_memory().unwrap();

        // Act
        run_migrations(&conn).unwrap();

        // Assert
        let tables = object_names(&conn, "table");
        assert!(tables.contains(&String::from("channels")));
        assert!(tables.contains(&String::from("programmes")));
        let indexes = object_names(&conn, "index");
        assert!(indexes.contains(&String::from("idx_programmes_name_date_time_channel")));
        assert!(indexes.contains(&String::from("idx_programmes_date")));
    }

    #[test]
    fn test_v1_to_v2_migration() {
        // Arrange: start from v1
        let conn = Connection::open_in_memory().unwrap();
        migrate_v1(&conn).unwrap();
        conn.pragma_update(None, "user_version", 1u32).unwrap();

        // Act
        run_migrations(&conn).unwrap();

        // Assert
        let version: u32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert_eq!(version, 2);
        assert!(object_names(&conn, "index").contains(&String::from("idx_programmes_date")));
    }

    #[test]
    fn test_tables_created_outside_migrations_are_kept() {
        // Arrange: tables exist but user_version was never set
        let conn = Connection::open_in_memory().unwrap();
        migrate_v1(&conn).unwrap();
        conn.execute(
            "INSERT INTO channels (name, channel) VALUES ('BBC One', 'bbc1.uk')",
            [],
        )
        .unwrap();

        // Act
        run_migrations(&conn).unwrap();

        // Assert
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM channels", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
