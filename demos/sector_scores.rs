//! End-to-end sector scoring demo.
//!
//! This example demonstrates:
//! - Seeding a store with synthetic daily OHLC history for two benchmark
//!   indices and three sectoral indices
//! - Running the full scoring pipeline (aggregate, ratio, tag, score)
//! - Reading back the stored tag/score tables per sector
//!
//! The database lives in a temporary directory and is discarded on exit.

use std::sync::Arc;

use chrono::NaiveDate;
use motril::pipeline::{PipelineConfig, ScoringPipeline};
use motril::store::SqliteStore;
use motril::traits::{DailySource, IndexCatalog, MonthlyStore, RatioStore};
use motril::{BenchmarkRole, DailyBar, IndexId, IndexRef};

/// Benchmark identifiers.
const PRIMARY_BENCHMARK: IndexId = IndexId(1);
const SECONDARY_BENCHMARK: IndexId = IndexId(2);

/// Sector universe: (id, name, base level, monthly drift).
const SECTORS: &[(i64, &str, f64, f64)] = &[
    (4, "Metals", 480.0, 0.035),
    (5, "Energy", 310.0, -0.018),
    (6, "Financials", 720.0, 0.009),
];

/// Months of history to generate (Jan onwards, 2024).
const MONTHS: u32 = 9;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let store = Arc::new(SqliteStore::open(dir.path().join("motril.db"))?);

    seed(&store)?;

    // Score October: the run consumes data through the end of September.
    let score_date = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
    let config = PipelineConfig::new(PRIMARY_BENCHMARK, SECONDARY_BENCHMARK, score_date);
    let source: Arc<dyn DailySource> = Arc::clone(&store) as Arc<dyn DailySource>;
    let monthly: Arc<dyn MonthlyStore> = Arc::clone(&store) as Arc<dyn MonthlyStore>;
    let ratios: Arc<dyn RatioStore> = Arc::clone(&store) as Arc<dyn RatioStore>;
    let catalog: Arc<dyn IndexCatalog> = Arc::clone(&store) as Arc<dyn IndexCatalog>;
    let pipeline = ScoringPipeline::new(source, monthly, ratios, catalog, config);

    let report = pipeline.run().await?;
    println!(
        "Scored {} sectors, {} rows written\n",
        report.scored, report.months_written
    );

    for &(id, name, _, _) in SECTORS {
        print_sector(&store, IndexId(id), name)?;
    }

    Ok(())
}

/// Populate the catalog and daily history.
fn seed(store: &SqliteStore) -> Result<(), Box<dyn std::error::Error>> {
    let benchmarks = [
        (PRIMARY_BENCHMARK, "Benchmark 50", 22_500.0, 0.012),
        (SECONDARY_BENCHMARK, "Benchmark 500", 8_400.0, 0.008),
    ];

    for (id, name, base, drift) in benchmarks {
        store.upsert_index(
            &IndexRef {
                id,
                name: name.to_string(),
            },
            true,
        )?;
        store.insert_daily_bars(id, &synthetic_bars(base, drift))?;
    }

    for &(id, name, base, drift) in SECTORS {
        store.upsert_index(
            &IndexRef {
                id: IndexId(id),
                name: name.to_string(),
            },
            false,
        )?;
        store.insert_daily_bars(IndexId(id), &synthetic_bars(base, drift))?;
    }

    Ok(())
}

/// Three sessions per month drifting from `base` at `drift` per month.
fn synthetic_bars(base: f64, drift: f64) -> Vec<DailyBar> {
    let mut level = base;
    let mut bars = Vec::new();

    for month in 1..=MONTHS {
        let start = level;
        level *= 1.0 + drift;

        for (i, day) in [3u32, 13, 23].into_iter().enumerate() {
            let t = i as f64 / 2.0;
            let close = start + (level - start) * t;
            let open = close * 0.995;
            bars.push(DailyBar {
                date: NaiveDate::from_ymd_opt(2024, month, day).unwrap(),
                open,
                high: close * 1.012,
                low: open * 0.991,
                close,
            });
        }
    }

    bars
}

/// Print the stored primary-benchmark table for one sector.
fn print_sector(
    store: &SqliteStore,
    id: IndexId,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let rows = store.ratio_rows(BenchmarkRole::Primary, id, None)?;

    println!("{name} vs primary benchmark");
    println!("{}", "=".repeat(name.len() + 21));
    println!(
        "{:<8} {:>10}  {:<15} {:>4} {:>4} {:>4}",
        "Month", "Close", "Tag", "s1", "s2", "s3"
    );
    for row in &rows {
        println!(
            "{:<8} {:>10.6}  {:<15} {:>4} {:>4} {:>4}",
            row.month.to_string(),
            row.close,
            row.tag.map_or("-", |t| t.as_str()),
            score(row.score_1),
            score(row.score_2),
            score(row.score_3),
        );
    }

    let secondary = store.ratio_rows(BenchmarkRole::Secondary, id, None)?;
    if let Some(last) = secondary.last() {
        println!(
            "vs secondary benchmark ({}): s1={} s2={} s3={}",
            last.month,
            score(last.score_1),
            score(last.score_2),
            score(last.score_3),
        );
    }
    println!();

    Ok(())
}

fn score(value: Option<i32>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
