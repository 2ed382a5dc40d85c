//! Pipeline configuration.

use chrono::{Datelike, Duration, NaiveDate};
use motril_traits::{IndexId, MotrilError, Result};

/// Configuration for one scoring run.
///
/// The two benchmark identifiers are fixed for a run; every sectoral
/// index is scored against both. All values are passed in explicitly —
/// the pipeline never reads ambient configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Identifier of the primary (narrow) benchmark index.
    pub primary_benchmark: IndexId,
    /// Identifier of the secondary (broad) benchmark index.
    pub secondary_benchmark: IndexId,
    /// The month being scored; data through the end of the previous
    /// month feeds the run.
    pub score_date: NaiveDate,
    /// Maximum number of indices scored concurrently.
    pub parallelism: usize,
}

impl PipelineConfig {
    /// Create a config with the default fan-out.
    #[must_use]
    pub const fn new(
        primary_benchmark: IndexId,
        secondary_benchmark: IndexId,
        score_date: NaiveDate,
    ) -> Self {
        Self {
            primary_benchmark,
            secondary_benchmark,
            score_date,
            parallelism: 4,
        }
    }

    /// The data cutoff for this run.
    ///
    /// # Errors
    ///
    /// Returns an error if the cutoff cannot be derived from
    /// `score_date`.
    pub fn cutoff(&self) -> Result<NaiveDate> {
        cutoff_for(self.score_date)
    }
}

/// The last calendar day of the month preceding `score_date`.
///
/// Scoring a month only ever uses data through the end of the month
/// before it, so a mid-month run does not see a partial candle.
///
/// # Errors
///
/// Returns an error if the first of the month cannot be constructed —
/// only possible for dates outside chrono's representable range.
pub fn cutoff_for(score_date: NaiveDate) -> Result<NaiveDate> {
    let first_of_month = score_date.with_day(1).ok_or_else(|| {
        MotrilError::InvalidDate(format!("no first day for month of {score_date}"))
    })?;
    Ok(first_of_month - Duration::days(1))
}
