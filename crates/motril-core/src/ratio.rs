//! Ratio series construction.
//!
//! A ratio candle divides a sectoral candle by the benchmark candle of the
//! same month, field by field. Only months present in both series
//! contribute; a month whose benchmark has any zero field is excluded
//! rather than producing infinities.

use motril_traits::{Candle, MonthlySeries, MotrilError, Result};

/// Divide one sectoral candle by its benchmark candle.
///
/// # Errors
///
/// Returns [`MotrilError::DivisionUndefined`] naming the offending field
/// when any benchmark field is zero. Zero benchmarks never occur in real
/// price data but must surface as a typed outcome, not as `inf`.
pub fn ratio_candle(sectoral: &Candle, benchmark: &Candle) -> Result<Candle> {
    let fields = [
        ("open", benchmark.open),
        ("high", benchmark.high),
        ("low", benchmark.low),
        ("close", benchmark.close),
    ];
    for (field, value) in fields {
        if value == 0.0 {
            return Err(MotrilError::DivisionUndefined {
                month: sectoral.period,
                field,
            });
        }
    }

    Ok(Candle::new(
        sectoral.period,
        sectoral.last_trade_date,
        sectoral.open / benchmark.open,
        sectoral.high / benchmark.high,
        sectoral.low / benchmark.low,
        sectoral.close / benchmark.close,
    ))
}

/// Build the chronological ratio series of `sectoral` against `benchmark`.
///
/// The output holds one candle per month present in **both** inputs, in
/// ascending month order — the ordering comes from the series' own map
/// ordering, never from insertion order. Months with a zero benchmark
/// field are dropped with a warning.
#[must_use]
pub fn build_ratio_series(sectoral: &MonthlySeries, benchmark: &MonthlySeries) -> Vec<Candle> {
    let mut candles = Vec::with_capacity(sectoral.len().min(benchmark.len()));
    for (month, sector_candle) in sectoral {
        let Some(benchmark_candle) = benchmark.get(month) else {
            continue;
        };
        match ratio_candle(sector_candle, benchmark_candle) {
            Ok(candle) => candles.push(candle),
            Err(err) => log::warn!("excluding month from ratio series: {err}"),
        }
    }
    candles
}
