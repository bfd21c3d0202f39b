//! Information coefficient: Spearman rank correlation of score vs outcome.
//!
//! Two modes share the same kernel (`stats::spearman`):
//!
//! - **time mode**: instruments are ranked cross-sectionally within each
//!   date, giving one IC per date — the daily model-quality series
//! - **grouped mode**: score and outcome are ranked within each base
//!   symbol's own time series, giving one IC per symbol — which
//!   instruments the model actually predicts
//!
//! An undefined correlation (under two points, or zero variance in a rank
//! vector) is `None`, never `0.0`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::debug;

use crate::domain::{Observation, RankStat, TopBottom};
use crate::error::EngineError;
use crate::stats::spearman;

/// Daily IC: one Spearman correlation per date, ordered by date ascending.
///
/// Rows missing `score` or `outcome` are excluded; a date left with fewer
/// than two complete rows still appears, with `correlation == None`.
pub fn daily_ic(observations: &[Observation]) -> Result<Vec<RankStat<NaiveDate>>, EngineError> {
    let mut by_date: BTreeMap<NaiveDate, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for obs in observations {
        let (Some(score), Some(outcome)) = (obs.score, obs.outcome) else {
            continue;
        };
        let entry = by_date.entry(obs.date).or_default();
        entry.0.push(score);
        entry.1.push(outcome);
    }

    if by_date.is_empty() {
        return Err(EngineError::EmptyInput);
    }

    debug!(dates = by_date.len(), "computing daily IC");

    Ok(by_date
        .into_iter()
        .map(|(date, (scores, outcomes))| RankStat {
            key: date,
            correlation: spearman(&scores, &outcomes),
            observation_count: scores.len(),
        })
        .collect())
}

/// Grouped IC: one Spearman correlation per base symbol, computed over that
/// symbol's own time series.
///
/// Symbols with fewer than `min_points` complete observations are dropped
/// entirely. Groups are evaluated in parallel and the output is sorted by
/// symbol, so ordering is deterministic regardless of scheduling.
pub fn grouped_ic(
    observations: &[Observation],
    delimiter: char,
    min_points: usize,
) -> Result<Vec<RankStat<String>>, EngineError> {
    let mut by_symbol: BTreeMap<String, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for obs in observations {
        let (Some(score), Some(outcome)) = (obs.score, obs.outcome) else {
            continue;
        };
        let entry = by_symbol
            .entry(obs.base_symbol(delimiter).to_string())
            .or_default();
        entry.0.push(score);
        entry.1.push(outcome);
    }

    if by_symbol.is_empty() {
        return Err(EngineError::EmptyInput);
    }

    let groups: Vec<(String, (Vec<f64>, Vec<f64>))> = by_symbol.into_iter().collect();
    debug!(symbols = groups.len(), min_points, "computing grouped IC");

    // Each group is independent; evaluate in parallel, then restore the
    // deterministic key ordering.
    let mut stats: Vec<RankStat<String>> = groups
        .par_iter()
        .filter(|(_, (scores, _))| scores.len() >= min_points)
        .map(|(symbol, (scores, outcomes))| RankStat {
            key: symbol.clone(),
            correlation: spearman(scores, outcomes),
            observation_count: scores.len(),
        })
        .collect();
    stats.sort_by(|a, b| a.key.cmp(&b.key));

    Ok(stats)
}

/// Top-N / bottom-N selection by correlation value.
///
/// Entries with an undefined or non-finite correlation are excluded before
/// ranking. `top` is the head of a descending sort (ties broken by key
/// ascending); `bottom` is the reversed tail of the same sort, i.e. in
/// ascending order with the worst entry first.
pub fn select_top_bottom<K: Ord + Clone>(
    stats: &[RankStat<K>],
    n: usize,
) -> TopBottom<RankStat<K>> {
    let mut ranked: Vec<(f64, &RankStat<K>)> = stats
        .iter()
        .filter_map(|s| match s.correlation {
            Some(c) if c.is_finite() => Some((c, s)),
            _ => None,
        })
        .collect();

    ranked.sort_by(|(ca, a), (cb, b)| {
        cb.partial_cmp(ca)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.key.cmp(&b.key))
    });

    let top: Vec<RankStat<K>> = ranked.iter().take(n).map(|(_, s)| (*s).clone()).collect();
    let tail_start = ranked.len().saturating_sub(n);
    let bottom: Vec<RankStat<K>> = ranked[tail_start..]
        .iter()
        .rev()
        .map(|(_, s)| (*s).clone())
        .collect();

    TopBottom { top, bottom }
}
