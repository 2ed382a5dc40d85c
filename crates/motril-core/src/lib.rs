//! The Motril scoring math.
//!
//! This crate implements the four purely computational stages of the
//! relative-strength pipeline, in the order they run for each index:
//!
//! - [`monthly`]: reduce a daily OHLC series to one candle per calendar
//!   month
//! - [`ratio`]: divide a sectoral monthly series by a benchmark monthly
//!   series, month by month
//! - [`tagger`]: assign each ratio candle one of four trend labels in a
//!   single forward pass
//! - [`scorer`]: accumulate trailing 1/2/3-month scores from the labels
//!
//! Every stage is a pure function of its input; there is no I/O and no
//! hidden state, so a scoring run is deterministic and idempotent.
//!
//! # Example
//!
//! ```ignore
//! use motril_core::{monthly, ratio, scorer, tagger};
//!
//! let sectoral = monthly::aggregate_monthly(sector_bars);
//! let benchmark = monthly::aggregate_monthly(benchmark_bars);
//!
//! let mut series = ratio::build_ratio_series(&sectoral, &benchmark);
//! tagger::tag_series(&mut series);
//! scorer::apply_scores(&mut series);
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod monthly;
pub mod ratio;
pub mod scorer;
pub mod tagger;

// Re-export the stage entry points
pub use monthly::aggregate_monthly;
pub use ratio::{build_ratio_series, ratio_candle};
pub use scorer::apply_scores;
pub use tagger::tag_series;
