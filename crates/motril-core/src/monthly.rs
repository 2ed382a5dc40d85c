//! Monthly aggregation of daily OHLC bars.

use std::collections::btree_map::Entry;

use motril_traits::{Candle, DailyBar, MonthKey, MonthlySeries};

/// Reduce a daily OHLC series to one candle per calendar month.
///
/// For each month present in the input:
/// - `open` is the open of the earliest trading day,
/// - `high` / `low` are the maximum high / minimum low across the month,
/// - `close` is the close of the latest trading day,
/// - `last_trade_date` records that latest day.
///
/// Bars are sorted by date before folding, so callers may pass them in
/// any order; "earliest" and "latest" always mean by date, not by row
/// position. An empty input yields an empty series — callers check for
/// emptiness before running downstream stages.
#[must_use]
pub fn aggregate_monthly(mut bars: Vec<DailyBar>) -> MonthlySeries {
    bars.sort_by_key(|bar| bar.date);

    let mut series = MonthlySeries::new();
    for bar in bars {
        let key = MonthKey::of(bar.date);
        match series.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(Candle::new(
                    key, bar.date, bar.open, bar.high, bar.low, bar.close,
                ));
            }
            Entry::Occupied(mut slot) => {
                let candle = slot.get_mut();
                candle.high = candle.high.max(bar.high);
                candle.low = candle.low.min(bar.low);
                candle.close = bar.close;
                candle.last_trade_date = bar.date;
            }
        }
    }
    series
}
