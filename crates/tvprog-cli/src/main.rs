//! tvprog - XMLTV television schedule importer.

/// Application configuration (TOML).
mod config;

use std::fs::File;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::{ArgGroup, Parser};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, DATABASE_ENV, resolve_config_path, resolve_db_path};
use tvprog_db::{
    ChannelRow, ImportCounts, ProgrammeRow, ScheduleRepository, Table, is_connection_error,
    open_db,
};
use tvprog_xmltv::{XmltvChannel, XmltvProgramme, parse_file};

/// Shown above the error chain when the database cannot be reached.
const CREDENTIALS_HINT: &str = "Check your database credentials and connection settings";

/// CLI argument parser.
///
/// Operations given together run in a fixed order: create tables,
/// truncate, import, delete older records.
#[derive(Parser)]
#[command(about, version, arg_required_else_help = true)]
#[command(group(
    ArgGroup::new("operation")
        .required(true)
        .multiple(true)
        .args(["create_tables", "truncate_tables", "delete_older", "file"])
))]
struct Cli {
    /// Override config/data directory.
    #[arg(long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Database file (overrides TVPROG_DATABASE and config.toml).
    #[arg(long, value_name = "PATH")]
    database: Option<PathBuf>,

    /// Create tables in database.
    #[arg(long)]
    create_tables: bool,

    /// Truncate tables.
    #[arg(long, num_args = 1.., value_name = "TABLES", value_parser = table_parser())]
    truncate_tables: Vec<Table>,

    /// Delete programmes dated N or more days ago.
    #[arg(long, value_name = "N", allow_negative_numbers = true, value_parser = parse_days)]
    delete_older: Option<NonZeroU32>,

    /// Import TV programme from an XMLTV file.
    #[arg(short = 'f', long, value_name = "FILE")]
    file: Option<PathBuf>,
}

/// Accepts only the names of the schedule tables.
fn table_parser() -> impl TypedValueParser<Value = Table> {
    PossibleValuesParser::new(Table::NAMES).try_map(|name| name.parse::<Table>())
}

/// Parses the `--delete-older` day count, which must be a positive integer.
fn parse_days(value: &str) -> Result<NonZeroU32, String> {
    let days: i64 = value
        .parse()
        .map_err(|_| format!("invalid int value: {value:?}"))?;
    if days < 1 {
        return Err(format!("expected > 0, got value = {days}"));
    }
    u32::try_from(days)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or_else(|| format!("value too large: {days}"))
}

/// Checks the import file up front so an unreadable path is rejected
/// before the database is touched.
///
/// # Errors
///
/// Returns an error if `path` is missing, is not a regular file, or cannot
/// be opened for reading.
fn check_import_file(path: &Path) -> Result<()> {
    let context = || format!("failed to open import file {}", path.display());
    let metadata = std::fs::metadata(path).with_context(context)?;
    if !metadata.is_file() {
        return Err(anyhow::anyhow!("not a regular file")).with_context(context);
    }
    File::open(path).with_context(context)?;
    Ok(())
}

/// Runs every operation selected on the command line.
///
/// # Errors
///
/// Returns an error if configuration is invalid or any operation fails;
/// later operations are skipped.
fn run(cli: &Cli) -> Result<()> {
    if let Some(path) = cli.file.as_deref() {
        check_import_file(path)?;
    }

    let config_path =
        resolve_config_path(cli.dir.as_deref()).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;
    let db_path = resolve_db_path(
        cli.database.as_deref(),
        std::env::var_os(DATABASE_ENV).map(PathBuf::from),
        &config,
        cli.dir.as_deref(),
    )
    .context("failed to resolve database path")?;

    let conn = open_db(&db_path).context("failed to connect to database")?;
    let repo = ScheduleRepository::new(&conn);

    if cli.create_tables {
        run_create_tables(&repo)?;
    }
    if !cli.truncate_tables.is_empty() {
        run_truncate_tables(&repo, &cli.truncate_tables)?;
    }
    if let Some(path) = cli.file.as_deref() {
        run_import(&repo, path)?;
    }
    if let Some(days) = cli.delete_older {
        run_delete_older(&repo, days)?;
    }

    Ok(())
}

/// Runs `--create-tables`.
#[instrument(skip_all)]
fn run_create_tables(repo: &ScheduleRepository<'_>) -> Result<()> {
    repo.create_schema()?;
    tracing::info!("Tables created");
    Ok(())
}

/// Runs `--truncate-tables`.
#[instrument(skip_all)]
fn run_truncate_tables(repo: &ScheduleRepository<'_>, tables: &[Table]) -> Result<()> {
    let truncated = repo.truncate(tables)?;
    report_truncated(truncated);
    Ok(())
}

/// Runs `--file`.
///
/// The whole document is parsed before anything is written, so a
/// malformed file leaves both tables untouched.
#[instrument(skip_all, fields(path = %path.display()))]
fn run_import(repo: &ScheduleRepository<'_>, path: &Path) -> Result<()> {
    let document =
        parse_file(path).with_context(|| format!("failed to parse {}", path.display()))?;
    tracing::debug!(
        channels = document.channels.len(),
        programmes = document.programmes.len(),
        "XMLTV file parsed"
    );

    let channels: Vec<ChannelRow> = document.channels.into_iter().map(to_channel_row).collect();
    let programmes: Vec<ProgrammeRow> = document
        .programmes
        .into_iter()
        .map(to_programme_row)
        .collect();

    let counts = repo.import(&channels, &programmes)?;
    report_imported(counts);
    Ok(())
}

/// Runs `--delete-older`.
#[instrument(skip_all)]
fn run_delete_older(repo: &ScheduleRepository<'_>, days: NonZeroU32) -> Result<()> {
    let deleted = repo.delete_older_than(days, Local::now().date_naive())?;
    report_deleted(deleted);
    Ok(())
}

/// Converts an `XmltvChannel` to a `ChannelRow` for DB storage.
fn to_channel_row(ch: XmltvChannel) -> ChannelRow {
    ChannelRow {
        name: ch.display_name,
        channel: ch.id,
    }
}

/// Converts an `XmltvProgramme` to a `ProgrammeRow` for DB storage.
///
/// `date`/`time` keep the source offset; `timestart`/`timestop` are epoch
/// seconds.
fn to_programme_row(p: XmltvProgramme) -> ProgrammeRow {
    ProgrammeRow {
        date: p.date(),
        time: p.time(),
        timestart: p.timestart(),
        timestop: p.timestop(),
        name: p.title,
        channel: p.channel,
    }
}

fn report_truncated(count: usize) {
    tracing::info!("Successfully truncated {} table(s)", count);
}

fn report_imported(counts: ImportCounts) {
    tracing::info!(
        "Import finished: {} channel(s), {} programme(s)",
        counts.channels,
        counts.programmes
    );
}

fn report_deleted(count: usize) {
    tracing::info!("Successfully deleted {} record(s)", count);
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if any selected operation fails. Connection failures
/// are prefixed with a hint to check the database settings.
fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    run(&cli).map_err(|err| {
        if is_connection_error(&err) {
            err.context(CREDENTIALS_HINT)
        } else {
            err
        }
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use chrono::{NaiveDate, NaiveTime};
    use clap::CommandFactory;
    use tracing::subscriber::with_default;
    use tracing_mock::{expect, subscriber};
    use tvprog_xmltv::parse_timestamp;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        // Arrange & Act & Assert
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_days_accepts_positive() {
        // Arrange & Act & Assert
        assert_eq!(parse_days("7").unwrap().get(), 7);
    }

    #[test]
    fn test_parse_days_rejects_zero_and_negative() {
        // Arrange & Act & Assert
        assert_eq!(parse_days("0").unwrap_err(), "expected > 0, got value = 0");
        assert_eq!(parse_days("-3").unwrap_err(), "expected > 0, got value = -3");
    }

    #[test]
    fn test_parse_days_rejects_non_integer() {
        // Arrange & Act
        let err = parse_days("1.5").unwrap_err();

        // Assert
        assert_eq!(err, "invalid int value: \"1.5\"");
    }

    #[test]
    fn test_parse_days_rejects_overflow() {
        // Arrange & Act
        let err = parse_days("4294967296").unwrap_err();

        // Assert
        assert!(err.starts_with("value too large"));
    }

    #[test]
    fn test_cli_parses_truncate_tables() {
        // Arrange & Act
        let cli =
            Cli::try_parse_from(["tvprog", "--truncate-tables", "channels", "programmes"]).unwrap();

        // Assert
        assert_eq!(cli.truncate_tables, vec![Table::Channels, Table::Programmes]);
    }

    #[test]
    fn test_cli_rejects_unknown_table() {
        // Arrange & Act
        let result = Cli::try_parse_from(["tvprog", "--truncate-tables", "sqlite_master"]);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_requires_an_operation() {
        // Arrange & Act
        let result = Cli::try_parse_from(["tvprog", "--dir", "/tmp"]);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_combines_operations() {
        // Arrange & Act
        let cli = Cli::try_parse_from([
            "tvprog",
            "--delete-older",
            "3",
            "-f",
            "guide.xml",
            "--create-tables",
        ])
        .unwrap();

        // Assert
        assert!(cli.create_tables);
        assert_eq!(cli.file, Some(PathBuf::from("guide.xml")));
        assert_eq!(cli.delete_older.map(NonZeroU32::get), Some(3));
    }

    #[test]
    fn test_check_import_file_accepts_regular_file() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guide.xml");
        std::fs::write(&path, "<tv/>").unwrap();

        // Act & Assert
        assert!(check_import_file(&path).is_ok());
    }

    #[test]
    fn test_check_import_file_rejects_directory() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();

        // Act
        let err = check_import_file(dir.path()).unwrap_err();

        // Assert
        assert!(err.to_string().starts_with("failed to open import file"));
        assert_eq!(err.root_cause().to_string(), "not a regular file");
    }

    #[test]
    fn test_check_import_file_rejects_missing_path() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();

        // Act
        let result = check_import_file(&dir.path().join("missing.xml"));

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_to_programme_row_splits_wall_clock_and_epoch() {
        // Arrange
        let prog = XmltvProgramme {
            channel: String::from("first.de"),
            title: String::from("Tagesschau"),
            start: parse_timestamp("20240315013000 +0200").unwrap(),
            stop: parse_timestamp("20240315030000 +0200").unwrap(),
        };

        // Act
        let row = to_programme_row(prog);

        // Assert
        assert_eq!(row.date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(row.time, NaiveTime::from_hms_opt(1, 30, 0).unwrap());
        assert_eq!(row.timestart, 1_710_459_000);
        assert_eq!(row.timestop, 1_710_464_400);
        assert_eq!(row.name, "Tagesschau");
        assert_eq!(row.channel, "first.de");
    }

    #[test]
    fn test_to_channel_row() {
        // Arrange
        let ch = XmltvChannel {
            id: String::from("bbc1.uk"),
            display_name: String::from("BBC One"),
        };

        // Act
        let row = to_channel_row(ch);

        // Assert
        assert_eq!(row.channel, "bbc1.uk");
        assert_eq!(row.name, "BBC One");
    }

    #[test]
    fn test_report_imported() {
        let (subscriber, handle) = subscriber::mock()
            .event(expect::event().with_fields(expect::msg(
                "Import finished: 1 channel(s), 1 programme(s)",
            )))
            .only()
            .run_with_handle();

        with_default(subscriber, || {
            report_imported(ImportCounts {
                channels: 1,
                programmes: 1,
            });
        });

        handle.assert_finished();
    }

    #[test]
    fn test_report_truncated() {
        let (subscriber, handle) = subscriber::mock()
            .event(expect::event().with_fields(expect::msg("Successfully truncated 2 table(s)")))
            .only()
            .run_with_handle();

        with_default(subscriber, || {
            report_truncated(2);
        });

        handle.assert_finished();
    }

    #[test]
    fn test_report_deleted() {
        let (subscriber, handle) = subscriber::mock()
            .event(
                expect::event()
                    .at_level(tracing::Level::INFO)
                    .with_fields(expect::msg("Successfully deleted 42 record(s)")),
            )
            .only()
            .run_with_handle();

        with_default(subscriber, || {
            report_deleted(42);
        });

        handle.assert_finished();
    }
}
