#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/motril/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core type definitions and trait seams for the Motril framework.
//!
//! This crate provides the foundational abstractions for building the
//! sectoral relative-strength scoring pipeline: the monthly candle data
//! model, the trend-tag vocabulary, and the collaborator traits through
//! which market data is read and scored rows are written.

/// The version of the motril-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod catalog;
pub mod error;
pub mod source;
pub mod store;
pub mod types;

// Re-exports
pub use catalog::IndexCatalog;
pub use error::{MotrilError, Result};
pub use source::DailySource;
pub use store::{MonthlyStore, RatioStore};
pub use types::{
    BenchmarkRole, Candle, DailyBar, IndexId, IndexRef, MonthKey, MonthlySeries, RatioRow,
    TrendTag,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }
}
