//! Trend tagging of ratio candle series.
//!
//! The tagger walks a chronological ratio series once, front to back, and
//! assigns each candle one of the four [`TrendTag`] labels from its
//! relationship to the immediately preceding candle. The only state
//! carried forward is the previous candle itself (open, close, and the
//! tag it was just given) — there is no separate trend variable, and no
//! candle's tag ever depends on a later candle.

use motril_traits::{Candle, TrendTag};

/// The previous candle as seen by the fold: its prices and the tag it was
/// assigned on the prior step.
#[derive(Debug, Clone, Copy)]
struct PrevCandle {
    open: f64,
    close: f64,
    tag: TrendTag,
}

/// Decide the tag for a candle closing at `curr_close`, given its
/// predecessor.
///
/// The branch structure is deliberately asymmetric between the rising and
/// falling cases: a fall out of a bullish state stays `Bullish` only when
/// the previous candle closed above its own open *and* the current close
/// still sits above that open, while a rise out of a bullish state needs
/// only one of the analogous conditions. Do not symmetrize — the
/// divergence tests below pin this shape.
fn next_tag(prev: PrevCandle, curr_close: f64) -> TrendTag {
    let prev_was_bullish = prev.tag.is_bullish();

    if curr_close > prev.close {
        // Ratio rose.
        if prev_was_bullish {
            if prev.close >= prev.open || curr_close > prev.open {
                TrendTag::HighlyBullish
            } else {
                TrendTag::Bullish
            }
        } else if prev.close > prev.open || curr_close > prev.open {
            TrendTag::Bullish
        } else {
            TrendTag::Bearish
        }
    } else if curr_close < prev.close {
        // Ratio fell.
        if prev_was_bullish {
            if prev.close >= prev.open && curr_close > prev.open {
                TrendTag::Bullish
            } else {
                TrendTag::Bearish
            }
        } else if prev.close <= prev.open {
            TrendTag::HighlyBearish
        } else if curr_close > prev.open {
            TrendTag::Bearish
        } else {
            TrendTag::HighlyBearish
        }
    } else {
        // Ratio unchanged.
        if prev_was_bullish {
            if prev.close >= prev.open {
                prev.tag
            } else {
                TrendTag::Bullish
            }
        } else if prev.close < prev.open {
            TrendTag::Bearish
        } else {
            prev.tag
        }
    }
}

/// Tag every candle of a chronological ratio series in one forward pass.
///
/// The first candle is always tagged [`TrendTag::Bullish`] (the seed
/// state); each subsequent candle is tagged from its predecessor via a
/// left fold. Tagging the same series twice produces identical labels.
pub fn tag_series(candles: &mut [Candle]) {
    let mut prev: Option<PrevCandle> = None;
    for candle in candles.iter_mut() {
        let tag = match prev {
            None => TrendTag::Bullish,
            Some(p) => next_tag(p, candle.close),
        };
        candle.tag = Some(tag);
        prev = Some(PrevCandle {
            open: candle.open,
            close: candle.close,
            tag,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use motril_traits::MonthKey;

    /// Build a series from (open, close) pairs; high/low are irrelevant to
    /// the tagger.
    fn series(prices: &[(f64, f64)]) -> Vec<Candle> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &(open, close))| {
                let month = MonthKey::new(2024, i as u32 + 1).unwrap();
                Candle::new(
                    month,
                    NaiveDate::from_ymd_opt(2024, i as u32 + 1, 28).unwrap(),
                    open,
                    open.max(close),
                    open.min(close),
                    close,
                )
            })
            .collect()
    }

    fn tags(prices: &[(f64, f64)]) -> Vec<TrendTag> {
        let mut candles = series(prices);
        tag_series(&mut candles);
        candles.into_iter().map(|c| c.tag.unwrap()).collect()
    }

    #[test]
    fn test_first_candle_is_always_bullish() {
        // Seed state holds no matter how the first candle looks.
        assert_eq!(tags(&[(1.0, 0.5)]), vec![TrendTag::Bullish]);
        assert_eq!(tags(&[(0.5, 1.0)]), vec![TrendTag::Bullish]);
    }

    #[test]
    fn test_empty_series_is_a_no_op() {
        let mut candles: Vec<Candle> = Vec::new();
        tag_series(&mut candles);
        assert!(candles.is_empty());
    }

    #[test]
    fn test_reference_scenario() {
        // Four months: seed, rise, pullback, rise.
        let prices = [(0.98, 1.00), (1.00, 1.05), (1.04, 1.03), (1.02, 1.10)];
        assert_eq!(
            tags(&prices),
            vec![
                TrendTag::Bullish,       // seed
                TrendTag::HighlyBullish, // rose, prev closed green
                TrendTag::Bullish,       // fell, but held above prev open
                TrendTag::HighlyBullish, // rose clear of prev open
            ]
        );
    }

    #[test]
    fn test_rise_from_bullish_red_candle() {
        // Prev bullish but closed below its own open (red candle at
        // 1.10 -> 1.02); a rise that clears the prev open is still
        // HighlyBullish, one that does not stays Bullish.
        assert_eq!(
            tags(&[(1.0, 1.0), (1.10, 1.02), (1.0, 1.05)]),
            vec![
                TrendTag::Bullish,
                TrendTag::HighlyBullish,
                TrendTag::Bullish
            ]
        );
        assert_eq!(
            tags(&[(1.0, 1.0), (1.10, 1.02), (1.0, 1.12)]),
            vec![
                TrendTag::Bullish,
                TrendTag::HighlyBullish,
                TrendTag::HighlyBullish
            ]
        );
    }

    #[test]
    fn test_fall_from_bullish_breaks_support() {
        // Falling below the previous open flips straight to Bearish even
        // out of a bullish state.
        assert_eq!(
            tags(&[(1.0, 1.2), (1.1, 1.3), (1.2, 1.05)]),
            vec![TrendTag::Bullish, TrendTag::HighlyBullish, TrendTag::Bearish]
        );
    }

    #[test]
    fn test_fall_in_bearish_state() {
        // Establish a bearish state, then keep falling: a red previous
        // candle makes the next fall HighlyBearish.
        let prices = [(1.0, 1.2), (1.2, 0.9), (0.95, 0.8), (0.85, 0.7)];
        let result = tags(&prices);
        assert_eq!(result[1], TrendTag::Bearish);
        assert_eq!(result[2], TrendTag::HighlyBearish);
        assert_eq!(result[3], TrendTag::HighlyBearish);
    }

    #[test]
    fn test_rise_in_bearish_state() {
        // A rise out of a bearish state earns only Bullish, never
        // HighlyBullish, and only once it clears the previous open.
        let prices = [(1.0, 1.2), (1.2, 0.9), (0.85, 1.25)];
        let result = tags(&prices);
        assert_eq!(result[1], TrendTag::Bearish);
        assert_eq!(result[2], TrendTag::Bullish);

        // The same rise stopping short of the previous open stays Bearish.
        let prices = [(1.0, 1.2), (1.2, 0.9), (0.85, 0.95)];
        assert_eq!(tags(&prices)[2], TrendTag::Bearish);
    }

    #[test]
    fn test_rise_in_bearish_state_below_prev_open_stays_bearish() {
        // Prev bearish and red, and the rise fails to clear the prev open.
        let prices = [(1.0, 1.2), (1.2, 0.9), (1.0, 0.8), (0.95, 0.85)];
        let result = tags(&prices);
        assert_eq!(result[2], TrendTag::HighlyBearish);
        assert_eq!(result[3], TrendTag::Bearish); // 0.85 < 1.0? prev open is 1.0
    }

    #[test]
    fn test_neutral_close_carries_tag_forward() {
        // Unchanged close with a green bullish predecessor keeps its tag.
        let prices = [(0.9, 1.0), (0.95, 1.1), (1.0, 1.1)];
        let result = tags(&prices);
        assert_eq!(result[1], TrendTag::HighlyBullish);
        assert_eq!(result[2], TrendTag::HighlyBullish);
    }

    #[test]
    fn test_neutral_close_after_red_bullish_softens_to_bullish() {
        // Candle 1 rises into HighlyBullish but closes red (1.2 -> 1.1);
        // an unchanged close after it softens to plain Bullish.
        let prices = [(0.9, 1.0), (1.2, 1.1), (1.15, 1.1)];
        let result = tags(&prices);
        assert_eq!(result[1], TrendTag::HighlyBullish);
        assert_eq!(result[2], TrendTag::Bullish);
    }

    #[test]
    fn test_neutral_close_after_red_bearish_stays_bearish() {
        // Establish Bearish, keep the candle red, hold the close flat.
        let prices = [(1.0, 1.2), (1.2, 0.9), (1.0, 0.9)];
        let result = tags(&prices);
        assert_eq!(result[1], TrendTag::Bearish);
        assert_eq!(result[2], TrendTag::Bearish);
    }

    #[test]
    fn test_determinism() {
        let prices = [(0.98, 1.00), (1.00, 1.05), (1.04, 1.03), (1.02, 1.10)];
        assert_eq!(tags(&prices), tags(&prices));
    }

    #[test]
    fn test_no_lookahead() {
        // Changing a later close never changes an earlier tag.
        let base = [(0.98, 1.00), (1.00, 1.05), (1.04, 1.03), (1.02, 1.10)];
        let mut mutated = base;
        mutated[3].1 = 0.5;

        let base_tags = tags(&base);
        let mutated_tags = tags(&mutated);
        assert_eq!(base_tags[..3], mutated_tags[..3]);
        assert_ne!(base_tags[3], mutated_tags[3]);
    }

    #[test]
    fn test_rise_fall_asymmetry() {
        // With prev green and bullish, a rise is HighlyBullish no matter
        // where it lands; a fall needs both conditions to stay Bullish.
        let rise = tags(&[(0.9, 1.0), (0.95, 1.01)]);
        assert_eq!(rise[1], TrendTag::HighlyBullish);

        let fall_holding = tags(&[(0.9, 1.0), (0.95, 0.99)]);
        assert_eq!(fall_holding[1], TrendTag::Bullish); // 0.99 > 0.9

        let fall_breaking = tags(&[(0.9, 1.0), (0.95, 0.85)]);
        assert_eq!(fall_breaking[1], TrendTag::Bearish); // 0.85 < 0.9
    }
}
