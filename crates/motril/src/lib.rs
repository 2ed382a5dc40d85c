#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/motril/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # motril
//!
//! Relative-strength momentum scoring for sectoral indices.
//!
//! motril is an umbrella crate that re-exports all motril sub-crates for
//! convenience. It provides a unified API for aggregating monthly
//! candles, building sector-to-benchmark ratio series, tagging trends,
//! accumulating scores, and running the whole batch against a store.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use motril::pipeline::{PipelineConfig, ScoringPipeline};
//! use motril::store::SqliteStore;
//! use motril::traits::IndexId;
//!
//! # #[tokio::main]
//! # async fn main() -> motril::Result<()> {
//! let store = Arc::new(SqliteStore::open("data/motril.db")?);
//!
//! let config = PipelineConfig::new(
//!     IndexId(1), // primary benchmark
//!     IndexId(2), // secondary benchmark
//!     chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
//! );
//!
//! let pipeline = ScoringPipeline::new(
//!     store.clone(),
//!     store.clone(),
//!     store.clone(),
//!     store,
//!     config,
//! );
//! let report = pipeline.run().await?;
//! println!("scored {} indices", report.scored);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! motril follows a modular architecture:
//!
//! 1. **Aggregation** reduces daily OHLC bars to one candle per month
//! 2. **Ratio construction** divides sectoral candles by benchmark candles
//! 3. **Tagging** labels each ratio candle from its predecessor
//! 4. **Scoring** accumulates trailing 1/2/3-month tag scores
//! 5. **The pipeline** orchestrates all of it across the index catalog

/// Version information for the motril crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core type and trait definitions for motril.
///
/// Re-exports `motril-traits`: the candle data model, the trend-tag
/// vocabulary, the error taxonomy, and the collaborator seams
/// (`DailySource`, `MonthlyStore`, `RatioStore`, `IndexCatalog`).
pub mod traits {
    pub use motril_traits::*;
}

/// The scoring math.
///
/// Re-exports `motril-core`: monthly aggregation, ratio construction,
/// trend tagging, and score accumulation. Every function here is pure —
/// no I/O, no hidden state.
pub mod core {
    pub use motril_core::*;
}

/// SQLite-backed collaborators.
///
/// Re-exports `motril-store`: a single database file acting as daily
/// source, monthly sink, ratio store for both benchmark roles, and index
/// catalog.
pub mod store {
    pub use motril_store::*;
}

/// Batch orchestration.
///
/// Re-exports `motril-pipeline`: the `ScoringPipeline` that fans out
/// across sectoral indices, and its `PipelineConfig`.
pub mod pipeline {
    pub use motril_pipeline::*;
}

// Re-export core types at top level for convenience
pub use motril_traits::{
    BenchmarkRole, Candle, DailyBar, IndexId, IndexRef, MonthKey, MonthlySeries, MotrilError,
    RatioRow, Result, TrendTag,
};

/// Prelude module for convenient imports.
///
/// This brings into scope:
/// - The candle data model: [`Candle`], [`MonthKey`], [`TrendTag`]
/// - The collaborator traits: `DailySource`, `MonthlyStore`,
///   `RatioStore`, `IndexCatalog`
/// - Error types: [`Result`], [`MotrilError`]
pub mod prelude {
    pub use motril_traits::{
        BenchmarkRole, Candle, DailyBar, DailySource, IndexCatalog, IndexId, IndexRef, MonthKey,
        MonthlySeries, MonthlyStore, MotrilError, RatioRow, RatioStore, Result, TrendTag,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert!(parts.len() >= 2, "Version should have at least major.minor");
    }

    #[test]
    fn test_re_exports() {
        // This test verifies that the re-exports compile correctly by
        // using them in type positions.
        fn _accept_source(_source: &dyn traits::DailySource) {}
        fn _accept_catalog(_catalog: &dyn traits::IndexCatalog) {}

        let _result: Result<()> = Ok(());
        let _tag = TrendTag::Bullish;
    }
}
