//! Database schema for the Motril store.
//!
//! Dates are stored as ISO-8601 text (`YYYY-MM-DD`) and months as
//! `YYYY-MM`, so lexicographic comparison in SQL matches chronological
//! order. The ratio tables carry the unique key that makes pipeline
//! upserts idempotent.

use rusqlite::Connection;

const DDL: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS indices (
        index_id INTEGER PRIMARY KEY,
        index_name TEXT NOT NULL,
        is_benchmark INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS daily_ohlc (
        index_id INTEGER NOT NULL REFERENCES indices(index_id),
        trade_date TEXT NOT NULL,
        open_price REAL NOT NULL,
        high_price REAL NOT NULL,
        low_price REAL NOT NULL,
        close_price REAL NOT NULL,
        UNIQUE (index_id, trade_date)
    )",
    "CREATE TABLE IF NOT EXISTS monthly_ohlc (
        index_id INTEGER NOT NULL REFERENCES indices(index_id),
        month TEXT NOT NULL,
        trade_date TEXT NOT NULL,
        open_price REAL NOT NULL,
        high_price REAL NOT NULL,
        low_price REAL NOT NULL,
        close_price REAL NOT NULL,
        UNIQUE (index_id, month)
    )",
    "CREATE TABLE IF NOT EXISTS primary_ratios (
        month TEXT NOT NULL,
        trade_date TEXT NOT NULL,
        sectoral_index_id INTEGER NOT NULL REFERENCES indices(index_id),
        benchmark_index_id INTEGER NOT NULL REFERENCES indices(index_id),
        open_ratio REAL NOT NULL,
        high_ratio REAL NOT NULL,
        low_ratio REAL NOT NULL,
        close_ratio REAL NOT NULL,
        tag TEXT,
        score_1 INTEGER,
        score_2 INTEGER,
        score_3 INTEGER,
        UNIQUE (month, sectoral_index_id, benchmark_index_id)
    )",
    "CREATE TABLE IF NOT EXISTS secondary_ratios (
        month TEXT NOT NULL,
        trade_date TEXT NOT NULL,
        sectoral_index_id INTEGER NOT NULL REFERENCES indices(index_id),
        benchmark_index_id INTEGER NOT NULL REFERENCES indices(index_id),
        open_ratio REAL NOT NULL,
        high_ratio REAL NOT NULL,
        low_ratio REAL NOT NULL,
        close_ratio REAL NOT NULL,
        tag TEXT,
        score_1 INTEGER,
        score_2 INTEGER,
        score_3 INTEGER,
        UNIQUE (month, sectoral_index_id, benchmark_index_id)
    )",
    "CREATE INDEX IF NOT EXISTS idx_daily_index_date
        ON daily_ohlc(index_id, trade_date)",
    "CREATE INDEX IF NOT EXISTS idx_primary_sectoral
        ON primary_ratios(sectoral_index_id, month)",
    "CREATE INDEX IF NOT EXISTS idx_secondary_sectoral
        ON secondary_ratios(sectoral_index_id, month)",
];

/// Create all tables and indexes if they do not exist yet.
pub(crate) fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    for statement in DDL {
        conn.execute(statement, [])?;
    }
    Ok(())
}
