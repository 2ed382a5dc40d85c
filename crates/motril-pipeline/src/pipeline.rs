//! The scoring pipeline.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use log::{info, warn};
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use motril_core::{aggregate_monthly, apply_scores, build_ratio_series, tag_series};
use motril_traits::{
    BenchmarkRole, Candle, DailySource, IndexCatalog, IndexId, IndexRef, MonthlySeries,
    MonthlyStore, MotrilError, RatioRow, RatioStore, Result,
};

use crate::config::PipelineConfig;

/// Summary of one scoring run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    /// Indices scored end to end.
    pub scored: usize,
    /// Indices skipped for missing or non-overlapping data.
    pub skipped: usize,
    /// Total ratio rows written across both benchmark roles.
    pub months_written: usize,
}

/// Orchestrates a scoring run across the sectoral index universe.
///
/// The pipeline is wired entirely through the collaborator traits; it
/// owns no connections and reads no ambient configuration. Re-running
/// with the same source data rewrites the same keyed rows.
pub struct ScoringPipeline {
    source: Arc<dyn DailySource>,
    monthly: Arc<dyn MonthlyStore>,
    ratios: Arc<dyn RatioStore>,
    catalog: Arc<dyn IndexCatalog>,
    config: PipelineConfig,
}

impl fmt::Debug for ScoringPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoringPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ScoringPipeline {
    /// Wire a pipeline from its collaborators.
    #[must_use]
    pub fn new(
        source: Arc<dyn DailySource>,
        monthly: Arc<dyn MonthlyStore>,
        ratios: Arc<dyn RatioStore>,
        catalog: Arc<dyn IndexCatalog>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            source,
            monthly,
            ratios,
            catalog,
            config,
        }
    }

    /// Run the full scoring batch.
    ///
    /// # Errors
    ///
    /// Fatal only when a benchmark series is empty, the catalog cannot be
    /// read, or a scoring task fails on storage. Per-index data problems
    /// are logged and counted as skips.
    pub async fn run(&self) -> Result<PipelineReport> {
        let cutoff = self.config.cutoff()?;
        info!(
            "scoring run for {} using data through {cutoff}",
            self.config.score_date
        );

        // Benchmark series are aggregated once and shared read-only with
        // every per-index task.
        let primary = Arc::new(
            self.benchmark_series(self.config.primary_benchmark, cutoff)
                .await?,
        );
        let secondary = Arc::new(
            self.benchmark_series(self.config.secondary_benchmark, cutoff)
                .await?,
        );

        let indices = self.catalog.sectoral_indices().await?;
        info!("{} sectoral indices in catalog", indices.len());

        let limit = Arc::new(Semaphore::new(self.config.parallelism.max(1)));
        let mut tasks: JoinSet<(IndexRef, Result<usize>)> = JoinSet::new();

        for index in indices {
            // The catalog excludes benchmarks; guard anyway so a
            // miscatalogued benchmark is never scored against itself.
            if index.id == self.config.primary_benchmark
                || index.id == self.config.secondary_benchmark
            {
                warn!("catalog returned benchmark index {}, ignoring", index.id);
                continue;
            }

            let source = Arc::clone(&self.source);
            let monthly = Arc::clone(&self.monthly);
            let ratios = Arc::clone(&self.ratios);
            let primary = Arc::clone(&primary);
            let secondary = Arc::clone(&secondary);
            let config = self.config.clone();
            let limit = Arc::clone(&limit);

            tasks.spawn(async move {
                let _permit = limit.acquire_owned().await.ok();
                let outcome = score_index(
                    source.as_ref(),
                    monthly.as_ref(),
                    ratios.as_ref(),
                    &config,
                    &index,
                    &primary,
                    &secondary,
                    cutoff,
                )
                .await;
                (index, outcome)
            });
        }

        let mut report = PipelineReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(written))) => {
                    report.scored += 1;
                    report.months_written += written;
                }
                Ok((_, Err(MotrilError::Storage(err)))) => {
                    // Storage failures are not data problems; abort.
                    return Err(MotrilError::Storage(err));
                }
                Ok((index, Err(err))) => {
                    warn!("skipping index {} ({}): {err}", index.id, index.name);
                    report.skipped += 1;
                }
                Err(join_err) => {
                    warn!("scoring task failed: {join_err}");
                    report.skipped += 1;
                }
            }
        }

        info!(
            "run complete: {} scored, {} skipped, {} rows",
            report.scored, report.skipped, report.months_written
        );
        Ok(report)
    }

    /// Aggregate and persist one benchmark's monthly series. Empty
    /// benchmark data is fatal — nothing can be scored without a
    /// denominator.
    async fn benchmark_series(&self, index: IndexId, cutoff: NaiveDate) -> Result<MonthlySeries> {
        let bars = self.source.daily_bars(index, cutoff).await?;
        let series = aggregate_monthly(bars);
        if series.is_empty() {
            return Err(MotrilError::MissingData { index, cutoff });
        }
        let candles: Vec<Candle> = series.values().cloned().collect();
        self.monthly.upsert_monthly(index, &candles).await?;
        Ok(series)
    }
}

/// Score one sectoral index against both benchmarks.
///
/// The chain is strictly sequential: aggregate, then per role
/// ratio → tag → score → upsert. Returns the number of rows written.
#[allow(clippy::too_many_arguments)]
async fn score_index(
    source: &dyn DailySource,
    monthly: &dyn MonthlyStore,
    ratios: &dyn RatioStore,
    config: &PipelineConfig,
    index: &IndexRef,
    primary: &MonthlySeries,
    secondary: &MonthlySeries,
    cutoff: NaiveDate,
) -> Result<usize> {
    let bars = source.daily_bars(index.id, cutoff).await?;
    let series = aggregate_monthly(bars);
    if series.is_empty() {
        return Err(MotrilError::MissingData {
            index: index.id,
            cutoff,
        });
    }

    let candles: Vec<Candle> = series.values().cloned().collect();
    monthly.upsert_monthly(index.id, &candles).await?;

    let benchmarks = [
        (BenchmarkRole::Primary, primary, config.primary_benchmark),
        (
            BenchmarkRole::Secondary,
            secondary,
            config.secondary_benchmark,
        ),
    ];

    let mut written = 0;
    for (role, benchmark, benchmark_id) in benchmarks {
        let mut ratio = build_ratio_series(&series, benchmark);
        if ratio.is_empty() {
            return Err(MotrilError::EmptyRatio(index.id));
        }
        tag_series(&mut ratio);
        apply_scores(&mut ratio);

        let rows: Vec<RatioRow> = ratio
            .iter()
            .map(|candle| RatioRow::from_candle(candle, index.id, benchmark_id))
            .collect();
        ratios.upsert_ratios(role, &rows).await?;
        written += rows.len();
    }

    Ok(written)
}
