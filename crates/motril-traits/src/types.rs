//! Common types used throughout the Motril framework.
//!
//! This module defines the monthly candle data model, the trend-tag
//! vocabulary, and the index identity types shared by every crate in the
//! workspace.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::MotrilError;

/// A calendar month identifier, ordered chronologically.
///
/// `MonthKey` is the key of every monthly series in Motril. Its derived
/// ordering compares `(year, month)`, so a `BTreeMap<MonthKey, Candle>`
/// iterates in chronological order by construction — later stages of the
/// pipeline depend on that ordering and never re-sort.
///
/// # Example
///
/// ```
/// use motril_traits::MonthKey;
///
/// let jan = MonthKey::new(2024, 1).unwrap();
/// let feb = MonthKey::new(2024, 2).unwrap();
/// assert!(jan < feb);
/// assert_eq!(feb.to_string(), "2024-02");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct MonthKey {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1 through 12.
    pub month: u32,
}

impl MonthKey {
    /// Create a month key, rejecting out-of-range months.
    #[must_use]
    pub const fn new(year: i32, month: u32) -> Option<Self> {
        if matches!(month, 1..=12) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// The month key containing the given calendar date.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = MotrilError;

    /// Parse a `YYYY-MM` month key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MotrilError::InvalidDate(format!("expected YYYY-MM, got {s:?}"));
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

/// One trading day of OHLC prices for a single index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    /// Trading date.
    pub date: NaiveDate,
    /// Opening price.
    pub open: f64,
    /// Intraday high.
    pub high: f64,
    /// Intraday low.
    pub low: f64,
    /// Closing price.
    pub close: f64,
}

/// Qualitative trend label assigned to a ratio candle.
///
/// Tags are assigned by the trend tagger in a single forward pass; each
/// candle's tag depends only on itself and its immediate predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendTag {
    /// Strong upward relative momentum.
    HighlyBullish,
    /// Upward relative momentum.
    Bullish,
    /// Downward relative momentum.
    Bearish,
    /// Strong downward relative momentum.
    HighlyBearish,
}

impl TrendTag {
    /// Signed integer contribution of this tag to trailing scores.
    #[must_use]
    pub const fn score(self) -> i32 {
        match self {
            Self::HighlyBullish => 2,
            Self::Bullish => 1,
            Self::Bearish => -1,
            Self::HighlyBearish => -2,
        }
    }

    /// Whether this tag belongs to the bullish group.
    ///
    /// The tagger branches on the group of the previous tag, not on the
    /// exact tag.
    #[must_use]
    pub const fn is_bullish(self) -> bool {
        matches!(self, Self::HighlyBullish | Self::Bullish)
    }

    /// Stable storage label for this tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HighlyBullish => "Highly Bullish",
            Self::Bullish => "Bullish",
            Self::Bearish => "Bearish",
            Self::HighlyBearish => "Highly Bearish",
        }
    }

    /// Parse a storage label back into a tag.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Highly Bullish" => Some(Self::HighlyBullish),
            "Bullish" => Some(Self::Bullish),
            "Bearish" => Some(Self::Bearish),
            "Highly Bearish" => Some(Self::HighlyBearish),
            _ => None,
        }
    }
}

impl fmt::Display for TrendTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One period's price action for an index or a ratio series.
///
/// `tag` and the trailing scores are populated only on ratio candles, by
/// the tagger and scorer respectively. They are derived solely from this
/// candle and earlier candles in the same series — never from later ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Calendar month this candle covers.
    pub period: MonthKey,
    /// Latest daily date folded into this candle.
    pub last_trade_date: NaiveDate,
    /// Open of the earliest day in the month.
    pub open: f64,
    /// Maximum daily high across the month.
    pub high: f64,
    /// Minimum daily low across the month.
    pub low: f64,
    /// Close of the latest day in the month.
    pub close: f64,
    /// Trend label, assigned by the tagger. Unset for raw monthly candles.
    pub tag: Option<TrendTag>,
    /// Sum of the previous tag's score; unset for the first candle.
    pub score_1: Option<i32>,
    /// Sum of the previous two tags' scores; unset without two predecessors.
    pub score_2: Option<i32>,
    /// Sum of the previous three tags' scores; unset without three predecessors.
    pub score_3: Option<i32>,
}

impl Candle {
    /// Create an untagged, unscored candle.
    #[must_use]
    pub const fn new(
        period: MonthKey,
        last_trade_date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    ) -> Self {
        Self {
            period,
            last_trade_date,
            open,
            high,
            low,
            close,
            tag: None,
            score_1: None,
            score_2: None,
            score_3: None,
        }
    }
}

/// A monthly candle series, chronologically ordered by its map key.
pub type MonthlySeries = BTreeMap<MonthKey, Candle>;

/// Opaque identifier of a market index.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct IndexId(pub i64);

impl fmt::Display for IndexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An index identifier together with its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRef {
    /// Index identifier.
    pub id: IndexId,
    /// Human-readable index name.
    pub name: String,
}

/// Which of the two fixed benchmarks a ratio series was built against.
///
/// Every sectoral index is scored twice, once per role. Rows for the two
/// roles are persisted to separate stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BenchmarkRole {
    /// The primary (narrow) benchmark.
    Primary,
    /// The secondary (broad) benchmark.
    Secondary,
}

impl BenchmarkRole {
    /// Stable lowercase name of this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }

    /// Both roles, in scoring order.
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::Primary, Self::Secondary]
    }
}

impl fmt::Display for BenchmarkRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One persisted row of the scored ratio series.
///
/// Keyed by `(month, sectoral, benchmark)`; re-running the pipeline
/// overwrites rows under the same key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioRow {
    /// Calendar month.
    pub month: MonthKey,
    /// Latest daily date folded into the month.
    pub last_trade_date: NaiveDate,
    /// Sectoral index the ratio was built for.
    pub sectoral: IndexId,
    /// Benchmark index used as the denominator.
    pub benchmark: IndexId,
    /// Open ratio.
    pub open: f64,
    /// High ratio.
    pub high: f64,
    /// Low ratio.
    pub low: f64,
    /// Close ratio.
    pub close: f64,
    /// Trend label for the month.
    pub tag: Option<TrendTag>,
    /// Trailing 1-month score.
    pub score_1: Option<i32>,
    /// Trailing 2-month score.
    pub score_2: Option<i32>,
    /// Trailing 3-month score.
    pub score_3: Option<i32>,
}

impl RatioRow {
    /// Build a row from a tagged and scored ratio candle.
    #[must_use]
    pub fn from_candle(candle: &Candle, sectoral: IndexId, benchmark: IndexId) -> Self {
        Self {
            month: candle.period,
            last_trade_date: candle.last_trade_date,
            sectoral,
            benchmark,
            open: candle.open,
            high: candle.high,
            low: candle.low,
            close: candle.close,
            tag: candle.tag,
            score_1: candle.score_1,
            score_2: candle.score_2,
            score_3: candle.score_3,
        }
    }
}
