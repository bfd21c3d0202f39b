//! Per-symbol expectancy: direction-filtered average outcomes.
//!
//! Observations are grouped by base symbol (venue and quote suffixes
//! stripped), filtered by the requested direction predicate on the score,
//! averaged, thresholded by a minimum observation count, and ranked into
//! top-N / bottom-N views.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{
    DEFAULT_SYMBOL_DELIMITER, Direction, Observation, SymbolExpectancy, TopBottom,
};
use crate::error::EngineError;

/// Aggregation parameters.
#[derive(Debug, Clone, Copy)]
pub struct ExpectancyConfig {
    pub direction: Direction,
    /// Groups with fewer observations than this are excluded before ranking.
    pub min_obs: usize,
    /// Size of each of the top and bottom views.
    pub top_n: usize,
    /// Base-symbol delimiter in instrument ids.
    pub delimiter: char,
}

impl Default for ExpectancyConfig {
    fn default() -> Self {
        Self {
            direction: Direction::Combined,
            min_obs: 5,
            top_n: 10,
            delimiter: DEFAULT_SYMBOL_DELIMITER,
        }
    }
}

/// Rank base symbols by mean outcome under a direction filter.
///
/// `top` is ordered descending by mean outcome, `bottom` ascending
/// (worst first, per the shared reversal convention). Ties in mean value
/// break by symbol lexical order for determinism.
pub fn symbol_expectancy(
    observations: &[Observation],
    config: &ExpectancyConfig,
) -> Result<TopBottom<SymbolExpectancy>, EngineError> {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for obs in observations {
        let (Some(score), Some(outcome)) = (obs.score, obs.outcome) else {
            continue;
        };
        if !config.direction.admits(score) {
            continue;
        }
        let entry = groups.entry(obs.base_symbol(config.delimiter)).or_default();
        entry.0 += outcome;
        entry.1 += 1;
    }

    // Threshold before ranking, never after.
    let mut ranked: Vec<SymbolExpectancy> = groups
        .into_iter()
        .filter(|(_, (_, count))| *count >= config.min_obs)
        .map(|(symbol, (sum, count))| SymbolExpectancy {
            symbol: symbol.to_string(),
            mean_outcome: sum / count as f64,
            count,
        })
        .collect();

    if ranked.is_empty() {
        return Err(EngineError::EmptyInput);
    }

    debug!(
        groups = ranked.len(),
        direction = ?config.direction,
        min_obs = config.min_obs,
        "symbol expectancy"
    );

    ranked.sort_by(|a, b| {
        b.mean_outcome
            .partial_cmp(&a.mean_outcome)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });

    let top: Vec<SymbolExpectancy> = ranked.iter().take(config.top_n).cloned().collect();
    let tail_start = ranked.len().saturating_sub(config.top_n);
    let bottom: Vec<SymbolExpectancy> = ranked[tail_start..].iter().rev().cloned().collect();

    Ok(TopBottom { top, bottom })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn obs(id: &str, score: f64, outcome: f64) -> Observation {
        Observation::new(day(1), id, Some(score), Some(outcome))
    }

    fn config(direction: Direction, min_obs: usize, top_n: usize) -> ExpectancyConfig {
        ExpectancyConfig {
            direction,
            min_obs,
            top_n,
            delimiter: '_',
        }
    }

    #[test]
    fn groups_by_base_symbol_and_ranks_by_mean() {
        let rows = vec![
            obs("BTC_USDT", 1.0, 0.04),
            obs("BTC_USDT_BINANCE", 1.0, 0.02),
            obs("ETH_USDT", 1.0, -0.01),
            obs("ETH_USDT", 1.0, -0.03),
            obs("SOL_USDT", 1.0, 0.01),
            obs("SOL_USDT", 1.0, 0.01),
        ];

        let views = symbol_expectancy(&rows, &config(Direction::Combined, 2, 2)).unwrap();

        let top: Vec<&str> = views.top.iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(top, vec!["BTC", "SOL"]);
        assert!((views.top[0].mean_outcome - 0.03).abs() < 1e-12);

        let bottom: Vec<&str> = views.bottom.iter().map(|e| e.symbol.as_str()).collect();
        // Ascending, worst first.
        assert_eq!(bottom, vec!["ETH", "SOL"]);
        assert!((views.bottom[0].mean_outcome + 0.02).abs() < 1e-12);
    }

    #[test]
    fn direction_filter_selects_rows_not_groups() {
        let rows = vec![
            obs("BTC_USDT", 1.0, 0.05),
            obs("BTC_USDT", -1.0, -0.09),
            obs("BTC_USDT", 2.0, 0.01),
        ];

        let long = symbol_expectancy(&rows, &config(Direction::Long, 1, 5)).unwrap();
        assert_eq!(long.top[0].count, 2);
        assert!((long.top[0].mean_outcome - 0.03).abs() < 1e-12);

        let short = symbol_expectancy(&rows, &config(Direction::Short, 1, 5)).unwrap();
        assert_eq!(short.top[0].count, 1);
        assert!((short.top[0].mean_outcome + 0.09).abs() < 1e-12);
    }

    #[test]
    fn groups_below_min_obs_never_appear() {
        let rows = vec![
            obs("BTC_USDT", 1.0, 0.9),
            obs("BTC_USDT", 1.0, 0.9),
            obs("BTC_USDT", 1.0, 0.9),
            // One short of min_obs = 3, despite the extreme mean.
            obs("DOGE_USDT", 1.0, -9.0),
            obs("DOGE_USDT", 1.0, -9.0),
        ];

        let views = symbol_expectancy(&rows, &config(Direction::Combined, 3, 10)).unwrap();
        assert!(views.top.iter().all(|e| e.symbol != "DOGE"));
        assert!(views.bottom.iter().all(|e| e.symbol != "DOGE"));
    }

    #[test]
    fn mean_ties_break_by_symbol() {
        let rows = vec![
            obs("BBB_X", 1.0, 0.01),
            obs("AAA_X", 1.0, 0.01),
            obs("CCC_X", 1.0, 0.01),
        ];
        let views = symbol_expectancy(&rows, &config(Direction::Combined, 1, 2)).unwrap();
        let top: Vec<&str> = views.top.iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(top, vec!["AAA", "BBB"]);
    }

    #[test]
    fn nothing_surviving_the_filter_is_empty_input() {
        let rows = vec![obs("BTC_USDT", -1.0, 0.01)];
        let err = symbol_expectancy(&rows, &config(Direction::Long, 1, 5)).unwrap_err();
        assert!(matches!(err, EngineError::EmptyInput));

        let err = symbol_expectancy(&[], &config(Direction::Combined, 1, 5)).unwrap_err();
        assert!(matches!(err, EngineError::EmptyInput));
    }
}
