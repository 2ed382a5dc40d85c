//! Error types for the Motril framework.
//!
//! Recoverable conditions (a missing monthly series, a zero benchmark
//! field) are represented as values so the pipeline's skip-and-continue
//! policy is enforced by control flow rather than by convention. Only
//! unrecoverable conditions (storage unavailable, catalog unreadable)
//! propagate to the pipeline caller.

use chrono::NaiveDate;
use thiserror::Error;

use crate::types::{IndexId, MonthKey};

/// The main error type for Motril operations.
#[derive(Debug, Error)]
pub enum MotrilError {
    /// A requested daily or monthly series is empty up to the cutoff.
    ///
    /// Recovered at the pipeline level by skipping the index; never raised
    /// by the aggregation stage itself.
    #[error("no price data for index {index} up to {cutoff}")]
    MissingData {
        /// Index whose series was empty.
        index: IndexId,
        /// Cutoff date of the query.
        cutoff: NaiveDate,
    },

    /// A benchmark field was zero during ratio construction.
    ///
    /// Recovered by excluding the month from the ratio series; the ratio
    /// builder never emits NaN or infinite values.
    #[error("benchmark {field} is zero for {month}")]
    DivisionUndefined {
        /// Month whose ratio could not be formed.
        month: MonthKey,
        /// Name of the zero benchmark field.
        field: &'static str,
    },

    /// Sectoral and benchmark series share no months.
    #[error("no overlapping months for index {0} against its benchmark")]
    EmptyRatio(IndexId),

    /// A date or month string could not be parsed.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// Error from the storage layer.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// The index catalog could not be read.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// Generic error for other cases.
    #[error("{0}")]
    Other(String),
}

impl From<String> for MotrilError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for MotrilError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for Motril operations.
pub type Result<T> = std::result::Result<T, MotrilError>;
