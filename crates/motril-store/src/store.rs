//! The SQLite store implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{Connection, params};

use motril_traits::{
    BenchmarkRole, Candle, DailyBar, DailySource, IndexCatalog, IndexId, IndexRef, MonthKey,
    MonthlyStore, MotrilError, RatioRow, RatioStore, Result, TrendTag,
};

use crate::schema;

/// A single SQLite database holding daily history, monthly aggregates,
/// scored ratio rows and the index catalog.
///
/// The store is `Send + Sync` behind an internal mutex, so one handle can
/// be shared (`Arc`) across the pipeline's per-index tasks. All writes go
/// through keyed upserts; re-running a scoring pass overwrites rather
/// than duplicates.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

const fn ratio_table(role: BenchmarkRole) -> &'static str {
    match role {
        BenchmarkRole::Primary => "primary_ratios",
        BenchmarkRole::Secondary => "secondary_ratios",
    }
}

fn date_text(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_date_text(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|e| MotrilError::InvalidDate(format!("{text:?}: {e}")))
}

impl SqliteStore {
    /// Open (or create) the database at `path` and ensure the schema.
    ///
    /// Parent directories are created as needed. The connection runs in
    /// WAL mode so pipeline reads do not block writes.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or the schema cannot
    /// be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    MotrilError::Other(format!(
                        "failed to create database directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        schema::ensure_schema(&conn)?;
        log::debug!("sqlite store initialized");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a transient in-memory store. Used by tests and demos.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::ensure_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| MotrilError::Other("store connection lock poisoned".to_string()))
    }

    /// Insert or update one catalog entry.
    ///
    /// # Errors
    ///
    /// Returns an error on a storage failure.
    pub fn upsert_index(&self, index: &IndexRef, is_benchmark: bool) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO indices (index_id, index_name, is_benchmark)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (index_id) DO UPDATE SET
                 index_name = excluded.index_name,
                 is_benchmark = excluded.is_benchmark",
            params![index.id.0, index.name, i64::from(is_benchmark)],
        )?;
        Ok(())
    }

    /// Insert or update daily bars for one index. Returns the number of
    /// bars written.
    ///
    /// # Errors
    ///
    /// Returns an error on a storage failure.
    pub fn insert_daily_bars(&self, index: IndexId, bars: &[DailyBar]) -> Result<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        for bar in bars {
            tx.execute(
                "INSERT INTO daily_ohlc
                     (index_id, trade_date, open_price, high_price, low_price, close_price)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT (index_id, trade_date) DO UPDATE SET
                     open_price = excluded.open_price,
                     high_price = excluded.high_price,
                     low_price = excluded.low_price,
                     close_price = excluded.close_price",
                params![
                    index.0,
                    date_text(bar.date),
                    bar.open,
                    bar.high,
                    bar.low,
                    bar.close
                ],
            )?;
        }
        tx.commit()?;
        Ok(bars.len())
    }

    /// Every catalog entry, benchmarks included, with its benchmark flag.
    ///
    /// # Errors
    ///
    /// Returns an error on a storage failure.
    pub fn all_indices(&self) -> Result<Vec<(IndexRef, bool)>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT index_id, index_name, is_benchmark FROM indices ORDER BY index_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?;

        let mut indices = Vec::new();
        for row in rows {
            let (id, name, is_benchmark) = row?;
            indices.push((
                IndexRef {
                    id: IndexId(id),
                    name,
                },
                is_benchmark != 0,
            ));
        }
        Ok(indices)
    }

    /// Read back stored ratio rows for one sectoral index, optionally
    /// restricted to a single month, in chronological order.
    ///
    /// # Errors
    ///
    /// Returns an error on a storage failure or if a stored month/date
    /// cannot be parsed.
    pub fn ratio_rows(
        &self,
        role: BenchmarkRole,
        sectoral: IndexId,
        month: Option<MonthKey>,
    ) -> Result<Vec<RatioRow>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT month, trade_date, sectoral_index_id, benchmark_index_id,
                    open_ratio, high_ratio, low_ratio, close_ratio,
                    tag, score_1, score_2, score_3
             FROM {table}
             WHERE sectoral_index_id = ?1 AND (?2 IS NULL OR month = ?2)
             ORDER BY month",
            table = ratio_table(role)
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![sectoral.0, month.map(|m| m.to_string())],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, f64>(4)?,
                    row.get::<_, f64>(5)?,
                    row.get::<_, f64>(6)?,
                    row.get::<_, f64>(7)?,
                    row.get::<_, Option<String>>(8)?,
                    row.get::<_, Option<i32>>(9)?,
                    row.get::<_, Option<i32>>(10)?,
                    row.get::<_, Option<i32>>(11)?,
                ))
            },
        )?;

        let mut out = Vec::new();
        for row in rows {
            let (month, trade_date, sectoral, benchmark, open, high, low, close, tag, s1, s2, s3) =
                row?;
            out.push(RatioRow {
                month: month.parse()?,
                last_trade_date: parse_date_text(&trade_date)?,
                sectoral: IndexId(sectoral),
                benchmark: IndexId(benchmark),
                open,
                high,
                low,
                close,
                tag: tag.as_deref().and_then(TrendTag::from_label),
                score_1: s1,
                score_2: s2,
                score_3: s3,
            });
        }
        Ok(out)
    }
}

#[async_trait]
impl DailySource for SqliteStore {
    async fn daily_bars(&self, index: IndexId, cutoff: NaiveDate) -> Result<Vec<DailyBar>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT trade_date, open_price, high_price, low_price, close_price
             FROM daily_ohlc
             WHERE index_id = ?1 AND trade_date <= ?2
             ORDER BY trade_date",
        )?;
        let rows = stmt.query_map(params![index.0, date_text(cutoff)], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, f64>(4)?,
            ))
        })?;

        let mut bars = Vec::new();
        for row in rows {
            let (date, open, high, low, close) = row?;
            bars.push(DailyBar {
                date: parse_date_text(&date)?,
                open,
                high,
                low,
                close,
            });
        }
        Ok(bars)
    }
}

#[async_trait]
impl MonthlyStore for SqliteStore {
    async fn upsert_monthly(&self, index: IndexId, candles: &[Candle]) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        for candle in candles {
            tx.execute(
                "INSERT INTO monthly_ohlc
                     (index_id, month, trade_date, open_price, high_price, low_price, close_price)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT (index_id, month) DO UPDATE SET
                     trade_date = excluded.trade_date,
                     open_price = excluded.open_price,
                     high_price = excluded.high_price,
                     low_price = excluded.low_price,
                     close_price = excluded.close_price",
                params![
                    index.0,
                    candle.period.to_string(),
                    date_text(candle.last_trade_date),
                    candle.open,
                    candle.high,
                    candle.low,
                    candle.close
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

#[async_trait]
impl RatioStore for SqliteStore {
    async fn upsert_ratios(&self, role: BenchmarkRole, rows: &[RatioRow]) -> Result<()> {
        let sql = format!(
            "INSERT INTO {table}
                 (month, trade_date, sectoral_index_id, benchmark_index_id,
                  open_ratio, high_ratio, low_ratio, close_ratio,
                  tag, score_1, score_2, score_3)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
             ON CONFLICT (month, sectoral_index_id, benchmark_index_id) DO UPDATE SET
                 trade_date = excluded.trade_date,
                 open_ratio = excluded.open_ratio,
                 high_ratio = excluded.high_ratio,
                 low_ratio = excluded.low_ratio,
                 close_ratio = excluded.close_ratio,
                 tag = excluded.tag,
                 score_1 = excluded.score_1,
                 score_2 = excluded.score_2,
                 score_3 = excluded.score_3",
            table = ratio_table(role)
        );

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        for row in rows {
            tx.execute(
                &sql,
                params![
                    row.month.to_string(),
                    date_text(row.last_trade_date),
                    row.sectoral.0,
                    row.benchmark.0,
                    row.open,
                    row.high,
                    row.low,
                    row.close,
                    row.tag.map(TrendTag::as_str),
                    row.score_1,
                    row.score_2,
                    row.score_3
                ],
            )?;
        }
        tx.commit()?;
        log::debug!("upserted {} rows into {}", rows.len(), ratio_table(role));
        Ok(())
    }
}

#[async_trait]
impl IndexCatalog for SqliteStore {
    async fn sectoral_indices(&self) -> Result<Vec<IndexRef>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT index_id, index_name FROM indices
             WHERE is_benchmark = 0
             ORDER BY index_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut indices = Vec::new();
        for row in rows {
            let (id, name) = row?;
            indices.push(IndexRef {
                id: IndexId(id),
                name,
            });
        }
        Ok(indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bar(y: i32, m: u32, d: u32, close: f64) -> DailyBar {
        DailyBar {
            date: date(y, m, d),
            open: close - 0.5,
            high: close + 1.0,
            low: close - 1.0,
            close,
        }
    }

    fn seeded_store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .upsert_index(
                &IndexRef {
                    id: IndexId(1),
                    name: "Benchmark A".to_string(),
                },
                true,
            )
            .unwrap();
        store
            .upsert_index(
                &IndexRef {
                    id: IndexId(4),
                    name: "Metals".to_string(),
                },
                false,
            )
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_daily_bars_cutoff_and_order() {
        let store = seeded_store();
        // Inserted out of order; reads come back sorted by date.
        store
            .insert_daily_bars(
                IndexId(4),
                &[bar(2024, 1, 20, 11.0), bar(2024, 1, 5, 10.0), bar(2024, 2, 3, 12.0)],
            )
            .unwrap();

        let bars = store
            .daily_bars(IndexId(4), date(2024, 1, 31))
            .await
            .unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, date(2024, 1, 5));
        assert_eq!(bars[1].date, date(2024, 1, 20));
    }

    #[tokio::test]
    async fn test_daily_bars_empty_for_unknown_index() {
        let store = seeded_store();
        let bars = store
            .daily_bars(IndexId(99), date(2024, 12, 31))
            .await
            .unwrap();
        assert!(bars.is_empty());
    }

    #[tokio::test]
    async fn test_monthly_upsert_overwrites() {
        let store = seeded_store();
        let month = MonthKey::new(2024, 1).unwrap();
        let mut candle = Candle::new(month, date(2024, 1, 31), 1.0, 2.0, 0.5, 1.5);

        store.upsert_monthly(IndexId(4), &[candle.clone()]).await.unwrap();
        candle.close = 1.8;
        store.upsert_monthly(IndexId(4), &[candle]).await.unwrap();

        let conn = store.conn.lock().unwrap();
        let (count, close): (i64, f64) = conn
            .query_row(
                "SELECT COUNT(*), MAX(close_price) FROM monthly_ohlc WHERE index_id = 4",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(close, 1.8);
    }

    #[tokio::test]
    async fn test_ratio_upsert_is_idempotent() {
        let store = seeded_store();
        let month = MonthKey::new(2024, 3).unwrap();
        let mut row = RatioRow {
            month,
            last_trade_date: date(2024, 3, 28),
            sectoral: IndexId(4),
            benchmark: IndexId(1),
            open: 1.1,
            high: 1.2,
            low: 0.9,
            close: 1.05,
            tag: Some(TrendTag::Bullish),
            score_1: Some(1),
            score_2: Some(2),
            score_3: None,
        };

        store
            .upsert_ratios(BenchmarkRole::Primary, &[row.clone()])
            .await
            .unwrap();
        row.tag = Some(TrendTag::HighlyBullish);
        row.score_3 = Some(4);
        store
            .upsert_ratios(BenchmarkRole::Primary, &[row.clone()])
            .await
            .unwrap();

        let rows = store
            .ratio_rows(BenchmarkRole::Primary, IndexId(4), Some(month))
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].tag, Some(TrendTag::HighlyBullish));
        assert_eq!(rows[0].score_3, Some(4));

        // The secondary store is untouched.
        let secondary = store
            .ratio_rows(BenchmarkRole::Secondary, IndexId(4), None)
            .unwrap();
        assert!(secondary.is_empty());
    }

    #[tokio::test]
    async fn test_catalog_excludes_benchmarks() {
        let store = seeded_store();
        let sectoral = store.sectoral_indices().await.unwrap();
        assert_eq!(sectoral.len(), 1);
        assert_eq!(sectoral[0].id, IndexId(4));
        assert_eq!(sectoral[0].name, "Metals");

        let all = store.all_indices().unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("motril.db");
        let store = SqliteStore::open(&path).unwrap();
        drop(store);
        assert!(path.exists());
    }
}
