//! Store wiring and argument parsing for the Motril CLI.

use std::env;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use motril_store::SqliteStore;

/// Open the store named by `--db`, falling back to the `MOTRIL_DB`
/// environment variable (a `.env` file is honoured if present).
pub(crate) fn open_store(arg: Option<&str>) -> Result<SqliteStore> {
    // Try to load .env file (ignore errors if not found)
    let _ = dotenvy::dotenv();

    let path = match arg {
        Some(path) => path.to_string(),
        None => env::var("MOTRIL_DB")
            .context("no --db argument given and MOTRIL_DB is not set")?,
    };

    SqliteStore::open(&path).with_context(|| format!("failed to open store at {path}"))
}

/// Parse a date string in YYYY-MM-DD format.
pub(crate) fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .with_context(|| format!("invalid date format: {date_str}"))
}
