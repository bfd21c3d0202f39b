//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they
//! can be:
//!
//! - used in-memory during analytics
//! - handed straight to the HTTP layer for JSON rendering
//! - reconstructed in tests without fixtures
//!
//! Every value that can be undefined (a correlation with zero variance, an
//! empty bucket's mean, a warm-up alpha/beta) is a first-class `Option` so
//! that NaN never leaks into downstream JSON.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Delimiter between the base symbol and the quote/venue suffix in an
/// instrument id (e.g. `BTC_USDT_BINANCE`).
pub const DEFAULT_SYMBOL_DELIMITER: char = '_';

/// One input row: a predicted score and the realized outcome for an
/// instrument on a calendar day.
///
/// Either side may be absent; rows missing a required side are excluded
/// from any computation that needs both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub instrument_id: String,
    pub score: Option<f64>,
    pub outcome: Option<f64>,
}

impl Observation {
    pub fn new(
        date: NaiveDate,
        instrument_id: impl Into<String>,
        score: Option<f64>,
        outcome: Option<f64>,
    ) -> Self {
        Self {
            date,
            instrument_id: instrument_id.into(),
            score,
            outcome,
        }
    }

    /// The base symbol: everything before the first `delimiter`.
    ///
    /// Ids without a delimiter are their own base symbol.
    pub fn base_symbol(&self, delimiter: char) -> &str {
        match self.instrument_id.find(delimiter) {
            Some(idx) => &self.instrument_id[..idx],
            None => &self.instrument_id,
        }
    }

    /// True when both `score` and `outcome` are present.
    pub fn is_complete(&self) -> bool {
        self.score.is_some() && self.outcome.is_some()
    }
}

/// An ordered `(date, value)` sequence: strictly increasing dates, no
/// duplicates. Input/output shape of the rolling engine.
///
/// Serialized as a plain array of pairs; deserialization goes through the
/// validating constructor so an unordered payload is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<(NaiveDate, f64)>",
    into = "Vec<(NaiveDate, f64)>"
)]
pub struct DailySeries {
    points: Vec<(NaiveDate, f64)>,
}

impl TryFrom<Vec<(NaiveDate, f64)>> for DailySeries {
    type Error = EngineError;

    fn try_from(points: Vec<(NaiveDate, f64)>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<DailySeries> for Vec<(NaiveDate, f64)> {
    fn from(series: DailySeries) -> Self {
        series.points
    }
}

impl DailySeries {
    /// Build a series, validating the date ordering.
    pub fn new(points: Vec<(NaiveDate, f64)>) -> Result<Self, EngineError> {
        for w in points.windows(2) {
            let (prev, next) = (w[0].0, w[1].0);
            if next <= prev {
                return Err(EngineError::UnorderedSeries(format!(
                    "{next} does not follow {prev}"
                )));
            }
        }
        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[(NaiveDate, f64)] {
        &self.points
    }

    pub fn get(&self, idx: usize) -> Option<(NaiveDate, f64)> {
        self.points.get(idx).copied()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|(d, _)| *d)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|(_, v)| *v)
    }
}

/// Direction filter for expectancy grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Only rows with `score > 0`.
    Long,
    /// Only rows with `score < 0`.
    Short,
    /// No score filter.
    Combined,
}

impl Direction {
    /// Whether a row with the given score passes this filter.
    pub fn admits(self, score: f64) -> bool {
        match self {
            Direction::Long => score > 0.0,
            Direction::Short => score < 0.0,
            Direction::Combined => true,
        }
    }
}

/// One percentile bucket after cross-sectional ranking.
///
/// `bucket` is 1-indexed in `1..=K`. `mean_outcome` is `None` only when no
/// rows landed in the bucket (`count == 0`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketResult {
    pub bucket: usize,
    pub mean_outcome: Option<f64>,
    pub count: usize,
}

/// A rank-correlation statistic keyed by date (time mode) or base symbol
/// (grouped mode).
///
/// `correlation` is `None` when the statistic is undefined (fewer than two
/// points or zero variance in a rank vector) — undefined is never reported
/// as zero, since zero is itself an informative value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankStat<K> {
    pub key: K,
    pub correlation: Option<f64>,
    pub observation_count: usize,
}

/// One position of a rolling alpha/beta computation.
///
/// `alpha`/`beta` are `None` during the warm-up span where the trailing
/// window has not reached the minimum sample count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingPoint {
    pub date: NaiveDate,
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
}

/// One histogram bin of the bootstrap sampling distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub center: f64,
    pub count: usize,
}

/// Bootstrap confidence interval and histogram for a daily statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapSummary {
    pub mean: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub histogram: Vec<HistogramBin>,
}

/// Per-symbol average outcome after direction filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolExpectancy {
    pub symbol: String,
    pub mean_outcome: f64,
    pub count: usize,
}

/// Top-N / bottom-N views of a ranked statistic.
///
/// `top` is ordered best-first (descending by value); `bottom` is ordered
/// ascending, i.e. worst-first — the reversed tail of the same descending
/// sort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopBottom<T> {
    pub top: Vec<T>,
    pub bottom: Vec<T>,
}
