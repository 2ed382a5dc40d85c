//! Motril CLI binary.
//!
//! Provides command-line interface for the Motril scoring pipeline.

mod db;

use std::process;
use std::sync::Arc;

use anyhow::{Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use motril_pipeline::{PipelineConfig, ScoringPipeline};
use motril_store::SqliteStore;
use motril_traits::{
    BenchmarkRole, DailyBar, DailySource, IndexCatalog, IndexId, IndexRef, MonthKey, MonthlyStore,
    RatioStore,
};

#[derive(Parser)]
#[command(name = "motril")]
#[command(about = "Relative-strength momentum scores for sectoral indices", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the SQLite database (defaults to MOTRIL_DB)
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scoring pipeline across the index catalog
    Score {
        /// Primary benchmark index id
        #[arg(long, default_value = "1")]
        primary: i64,

        /// Secondary benchmark index id
        #[arg(long, default_value = "2")]
        secondary: i64,

        /// Score date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Maximum indices scored concurrently
        #[arg(short, long, default_value = "4")]
        jobs: usize,
    },

    /// Show stored tags and scores for one sectoral index
    Show {
        /// Sectoral index id
        index: i64,

        /// Benchmark role (primary or secondary)
        #[arg(short, long, default_value = "primary")]
        role: String,

        /// Restrict output to one month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List the index catalog
    Indices,

    /// Load daily bars for an index from a JSON file
    Seed {
        /// Index id to load into
        index: i64,

        /// Index display name
        #[arg(long)]
        name: String,

        /// Mark the index as a benchmark
        #[arg(long)]
        benchmark: bool,

        /// Path to a JSON array of daily bars
        file: String,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let store = db::open_store(cli.db.as_deref())?;

    match cli.command {
        Commands::Score {
            primary,
            secondary,
            date,
            jobs,
        } => {
            run_score(store, primary, secondary, date, jobs).await?;
        }
        Commands::Show {
            index,
            role,
            month,
            format,
        } => {
            show_scores(&store, index, &role, month, &format)?;
        }
        Commands::Indices => {
            list_indices(&store)?;
        }
        Commands::Seed {
            index,
            name,
            benchmark,
            file,
        } => {
            seed_index(&store, index, &name, benchmark, &file)?;
        }
    }

    Ok(())
}

async fn run_score(
    store: SqliteStore,
    primary: i64,
    secondary: i64,
    date: Option<String>,
    jobs: usize,
) -> Result<()> {
    let score_date = match date {
        Some(ref d) => db::parse_date(d)?,
        None => Utc::now().date_naive(),
    };

    let mut config = PipelineConfig::new(IndexId(primary), IndexId(secondary), score_date);
    config.parallelism = jobs;
    let cutoff = config.cutoff()?;

    println!("Scoring run for {score_date} (data through {cutoff})");
    println!(
        "Benchmarks: primary={primary}, secondary={secondary}, jobs={jobs}"
    );
    println!();

    let store = Arc::new(store);
    let source: Arc<dyn DailySource> = Arc::clone(&store) as Arc<dyn DailySource>;
    let monthly: Arc<dyn MonthlyStore> = Arc::clone(&store) as Arc<dyn MonthlyStore>;
    let ratios: Arc<dyn RatioStore> = Arc::clone(&store) as Arc<dyn RatioStore>;
    let catalog: Arc<dyn IndexCatalog> = store as Arc<dyn IndexCatalog>;
    let pipeline = ScoringPipeline::new(source, monthly, ratios, catalog, config);

    let report = pipeline.run().await?;

    println!("Scored:  {:>6} indices", report.scored);
    println!("Skipped: {:>6} indices", report.skipped);
    println!("Rows:    {:>6} written", report.months_written);

    Ok(())
}

fn parse_role(role: &str) -> Result<BenchmarkRole> {
    match role.to_lowercase().as_str() {
        "primary" | "p" => Ok(BenchmarkRole::Primary),
        "secondary" | "s" => Ok(BenchmarkRole::Secondary),
        other => bail!("unknown benchmark role '{other}'. Use 'primary' or 'secondary'."),
    }
}

fn show_scores(
    store: &SqliteStore,
    index: i64,
    role: &str,
    month: Option<String>,
    format: &str,
) -> Result<()> {
    let role = parse_role(role)?;
    let month: Option<MonthKey> = month.as_deref().map(str::parse).transpose()?;

    let rows = store.ratio_rows(role, IndexId(index), month)?;
    if rows.is_empty() {
        println!("No stored rows for index {index} ({role} benchmark). Run `motril score` first.");
        return Ok(());
    }

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "{:<8} {:>10} {:>10} {:>10} {:>10}  {:<15} {:>4} {:>4} {:>4}",
        "Month", "Open", "High", "Low", "Close", "Tag", "s1", "s2", "s3"
    );
    println!("{}", "-".repeat(86));
    for row in &rows {
        println!(
            "{:<8} {:>10.6} {:>10.6} {:>10.6} {:>10.6}  {:<15} {:>4} {:>4} {:>4}",
            row.month.to_string(),
            row.open,
            row.high,
            row.low,
            row.close,
            row.tag.map_or("-", |t| t.as_str()),
            fmt_score(row.score_1),
            fmt_score(row.score_2),
            fmt_score(row.score_3),
        );
    }

    Ok(())
}

fn fmt_score(score: Option<i32>) -> String {
    score.map_or_else(|| "-".to_string(), |s| s.to_string())
}

fn list_indices(store: &SqliteStore) -> Result<()> {
    let indices = store.all_indices()?;
    if indices.is_empty() {
        println!("Catalog is empty. Use `motril seed` to add indices.");
        return Ok(());
    }

    println!("{:<8} {:<30} {}", "Id", "Name", "Role");
    println!("{}", "-".repeat(50));
    for (index, is_benchmark) in indices {
        let role = if is_benchmark { "benchmark" } else { "sectoral" };
        println!("{:<8} {:<30} {}", index.id.to_string(), index.name, role);
    }

    Ok(())
}

fn seed_index(
    store: &SqliteStore,
    index: i64,
    name: &str,
    benchmark: bool,
    file: &str,
) -> Result<()> {
    let contents = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("failed to read {file}: {e}"))?;
    let bars: Vec<DailyBar> = serde_json::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("failed to parse {file}: {e}"))?;

    store.upsert_index(
        &IndexRef {
            id: IndexId(index),
            name: name.to_string(),
        },
        benchmark,
    )?;
    let written = store.insert_daily_bars(IndexId(index), &bars)?;

    println!("Loaded {written} daily bars into index {index} ({name})");
    Ok(())
}
