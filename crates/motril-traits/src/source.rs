//! Source trait for reading daily OHLC series.
//!
//! This module defines the `DailySource` trait, the read seam between the
//! scoring pipeline and whatever holds the raw daily price history. The
//! pipeline only ever asks for one index's bars up to a cutoff date.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{DailyBar, IndexId, Result};

/// A time-ordered reader of daily OHLC bars for one index.
///
/// Implementations should be cheap to share (`Send + Sync`) so the
/// pipeline can fan out across sectoral indices. Returning an empty `Vec`
/// for an index with no data is the expected behavior, not an error — the
/// caller decides whether emptiness is fatal (a benchmark) or skippable
/// (a sectoral index).
///
/// Bars may be returned in any order; the monthly aggregator sorts by
/// date before folding.
///
/// # Example
///
/// ```no_run
/// use async_trait::async_trait;
/// use chrono::NaiveDate;
/// use motril_traits::{DailyBar, DailySource, IndexId, Result};
///
/// struct EmptySource;
///
/// #[async_trait]
/// impl DailySource for EmptySource {
///     async fn daily_bars(&self, _index: IndexId, _cutoff: NaiveDate) -> Result<Vec<DailyBar>> {
///         Ok(Vec::new())
///     }
/// }
/// ```
#[async_trait]
pub trait DailySource: Send + Sync {
    /// Fetch all daily bars for `index` with dates up to and including
    /// `cutoff`.
    ///
    /// # Errors
    ///
    /// Returns an error only when the underlying store cannot be read;
    /// an index with no data yields `Ok(vec![])`.
    async fn daily_bars(&self, index: IndexId, cutoff: NaiveDate) -> Result<Vec<DailyBar>>;
}
