//! Sink traits for persisting monthly candles and scored ratio rows.
//!
//! Both sinks are upsert-keyed: re-running the pipeline over the same
//! months overwrites prior rows instead of duplicating them, which is what
//! makes a scoring run idempotent end to end.

use async_trait::async_trait;

use crate::{BenchmarkRole, Candle, IndexId, RatioRow, Result};

/// An upsert-capable store of aggregated monthly candles, keyed by
/// `(index, month)`.
#[async_trait]
pub trait MonthlyStore: Send + Sync {
    /// Insert or overwrite the monthly candles for `index`.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying store cannot be written.
    async fn upsert_monthly(&self, index: IndexId, candles: &[Candle]) -> Result<()>;
}

/// An upsert-capable store of scored ratio rows, keyed by
/// `(month, sectoral, benchmark)` — one logical store per benchmark role.
#[async_trait]
pub trait RatioStore: Send + Sync {
    /// Insert or overwrite the given rows in the store for `role`.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying store cannot be written.
    async fn upsert_ratios(&self, role: BenchmarkRole, rows: &[RatioRow]) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stores_are_object_safe() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn MonthlyStore>();
        assert_send_sync::<dyn RatioStore>();
    }
}
