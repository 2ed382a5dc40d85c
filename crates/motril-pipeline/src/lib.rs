//! Batch orchestration for Motril scoring runs.
//!
//! The pipeline walks the sectoral index catalog and, for each index,
//! runs the full chain: fetch daily bars, aggregate to monthly candles,
//! build the ratio series against each of the two benchmarks, tag, score,
//! and upsert the resulting rows. Benchmark series are computed once per
//! run and shared read-only across indices; the indices themselves fan
//! out over a bounded set of tasks since their chains touch disjoint
//! data.
//!
//! An index with no usable data is skipped with a warning — one bad index
//! never aborts the batch. Only an empty benchmark series, an unreadable
//! catalog, or a storage failure is fatal.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

mod config;
mod pipeline;

pub use config::{PipelineConfig, cutoff_for};
pub use pipeline::{PipelineReport, ScoringPipeline};
