//! Trailing score accumulation over tagged ratio series.

use motril_traits::{Candle, TrendTag};

/// Populate `score_1`, `score_2` and `score_3` on a tagged series.
///
/// The score at index `i` over a window of `n` months is the sum of the
/// signed tag values of candles `i-n .. i` — strictly the months before
/// the current one; a candle's own tag never contributes to its own
/// score. Windows that reach past the start of the series stay `None`
/// rather than defaulting to zero.
///
/// Untagged candles contribute 0, though after tagging that case does not
/// arise.
pub fn apply_scores(candles: &mut [Candle]) {
    let values: Vec<i32> = candles
        .iter()
        .map(|candle| candle.tag.map_or(0, TrendTag::score))
        .collect();

    for i in 0..candles.len() {
        if i >= 1 {
            candles[i].score_1 = Some(values[i - 1]);
        }
        if i >= 2 {
            candles[i].score_2 = Some(values[i - 2] + values[i - 1]);
        }
        if i >= 3 {
            candles[i].score_3 = Some(values[i - 3] + values[i - 2] + values[i - 1]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use motril_traits::MonthKey;

    fn tagged(tags: &[TrendTag]) -> Vec<Candle> {
        tags.iter()
            .enumerate()
            .map(|(i, &tag)| {
                let month = MonthKey::new(2024, i as u32 + 1).unwrap();
                let mut candle = Candle::new(
                    month,
                    NaiveDate::from_ymd_opt(2024, i as u32 + 1, 28).unwrap(),
                    1.0,
                    1.0,
                    1.0,
                    1.0,
                );
                candle.tag = Some(tag);
                candle
            })
            .collect()
    }

    #[test]
    fn test_windows_need_history() {
        use TrendTag::*;
        let mut candles = tagged(&[Bullish, Bearish, HighlyBullish, HighlyBearish]);
        apply_scores(&mut candles);

        // Index 0 has no history at all.
        assert_eq!(candles[0].score_1, None);
        assert_eq!(candles[0].score_2, None);
        assert_eq!(candles[0].score_3, None);

        // Index 1: one predecessor, only score_1.
        assert_eq!(candles[1].score_1, Some(1));
        assert_eq!(candles[1].score_2, None);

        // Index 2: two predecessors.
        assert_eq!(candles[2].score_1, Some(-1));
        assert_eq!(candles[2].score_2, Some(0));
        assert_eq!(candles[2].score_3, None);

        // Index 3: full history.
        assert_eq!(candles[3].score_1, Some(2));
        assert_eq!(candles[3].score_2, Some(1));
        assert_eq!(candles[3].score_3, Some(2));
    }

    #[test]
    fn test_own_tag_never_contributes() {
        use TrendTag::*;
        // A HighlyBearish candle after three HighlyBullish months still
        // scores +2/+4/+6 — its own -2 is invisible to itself.
        let mut candles = tagged(&[HighlyBullish, HighlyBullish, HighlyBullish, HighlyBearish]);
        apply_scores(&mut candles);
        assert_eq!(candles[3].score_1, Some(2));
        assert_eq!(candles[3].score_2, Some(4));
        assert_eq!(candles[3].score_3, Some(6));
    }

    #[test]
    fn test_score_3_decomposes() {
        use TrendTag::*;
        // score_3[i] == score_2[i] + value(tag[i-3]) wherever defined.
        let mut candles = tagged(&[
            Bullish,
            HighlyBullish,
            Bearish,
            HighlyBearish,
            Bullish,
            Bearish,
        ]);
        apply_scores(&mut candles);

        let values: Vec<i32> = candles.iter().map(|c| c.tag.unwrap().score()).collect();
        for i in 3..candles.len() {
            assert_eq!(
                candles[i].score_3.unwrap(),
                candles[i].score_2.unwrap() + values[i - 3]
            );
        }
    }

    #[test]
    fn test_reference_scenario_score() {
        use TrendTag::*;
        // Tags from the four-month tagging scenario; the final 3-month
        // score is 2 + 1 + 2 = 5.
        let mut candles = tagged(&[Bullish, HighlyBullish, Bullish, HighlyBullish]);
        apply_scores(&mut candles);
        assert_eq!(candles[3].score_3, Some(5));
    }

    #[test]
    fn test_untagged_candles_count_as_zero() {
        let mut candles = tagged(&[TrendTag::Bullish, TrendTag::Bullish]);
        candles[0].tag = None;
        apply_scores(&mut candles);
        assert_eq!(candles[1].score_1, Some(0));
    }

    #[test]
    fn test_no_lookahead_through_tagging_and_scoring() {
        use crate::tagger::tag_series;

        let build = |closes: &[f64]| -> Vec<Candle> {
            let mut candles: Vec<Candle> = closes
                .iter()
                .enumerate()
                .map(|(i, &close)| {
                    let month = MonthKey::new(2024, i as u32 + 1).unwrap();
                    Candle::new(
                        month,
                        NaiveDate::from_ymd_opt(2024, i as u32 + 1, 28).unwrap(),
                        close * 0.98,
                        close * 1.02,
                        close * 0.97,
                        close,
                    )
                })
                .collect();
            tag_series(&mut candles);
            apply_scores(&mut candles);
            candles
        };

        // Mutating the last close changes nothing before it.
        let base = build(&[1.00, 1.05, 1.03, 1.10, 1.08]);
        let mutated = build(&[1.00, 1.05, 1.03, 1.10, 0.60]);
        assert_eq!(base[..4], mutated[..4]);
    }

    #[test]
    fn test_rescoring_is_idempotent() {
        use TrendTag::*;
        let mut once = tagged(&[Bullish, Bearish, HighlyBullish, Bullish]);
        apply_scores(&mut once);
        let mut twice = once.clone();
        apply_scores(&mut twice);
        assert_eq!(once, twice);
    }
}
