//! Trailing-window statistics over daily series.
//!
//! The dashboard draws several rolling charts (alpha/beta, rolling mean IC,
//! rolling spread, rolling hit-rate) that are all the same loop with a
//! different statistic inside. [`rolling_stat`] is that loop, written once,
//! with the warm-up / minimum-sample policy enforced uniformly;
//! [`rolling_alpha_beta`] is the two-series OLS special case.
//!
//! Windows are recomputed from scratch per position. The window sizes in
//! play are small (weeks to months of daily data), so the quadratic cost is
//! irrelevant next to getting the warm-up semantics right.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{DailySeries, RollingPoint};
use crate::error::EngineError;
use crate::stats::{mean, sample_covariance, sample_variance};

/// Windows with fewer observations than this emit null (warm-up policy).
pub const MIN_WINDOW_OBS: usize = 7;

/// Rolling computation parameters.
#[derive(Debug, Clone, Copy)]
pub struct RollingConfig {
    /// Trailing window length in positions.
    pub window: usize,
    /// Benchmark time shift: strategy position `i` is paired with benchmark
    /// position `i - lag`, so the benchmark value reflects information
    /// available before the strategy observation.
    pub lag: usize,
}

impl Default for RollingConfig {
    fn default() -> Self {
        Self { window: 30, lag: 1 }
    }
}

/// Rolling OLS alpha/beta of a strategy series against a benchmark series.
///
/// Both series must have equal length; the caller is responsible for date
/// alignment. Output has one `RollingPoint` per strategy position, with
/// `None` alpha/beta wherever the trailing window holds fewer than
/// [`MIN_WINDOW_OBS`] aligned pairs. Warm-up nulls are preserved
/// positionally, never dropped.
///
/// Per window: `beta = cov(s, b) / var(b)` (sample denominators), guarded
/// to `0` when the benchmark variance is zero; `alpha = mean(s) - beta *
/// mean(b)`.
pub fn rolling_alpha_beta(
    strategy: &DailySeries,
    benchmark: &DailySeries,
    config: &RollingConfig,
) -> Result<Vec<RollingPoint>, EngineError> {
    if config.window == 0 {
        return Err(EngineError::InvalidParameter(
            "window must be > 0".to_string(),
        ));
    }
    if strategy.is_empty() {
        return Err(EngineError::EmptyInput);
    }
    if strategy.len() != benchmark.len() {
        return Err(EngineError::InvalidParameter(format!(
            "strategy has {} points but benchmark has {}",
            strategy.len(),
            benchmark.len()
        )));
    }

    let s: Vec<f64> = strategy.values().collect();
    let b: Vec<f64> = benchmark.values().collect();
    let n = s.len();

    debug!(n, window = config.window, lag = config.lag, "rolling alpha/beta");

    let mut out = Vec::with_capacity(n);
    for (i, date) in strategy.dates().enumerate() {
        // Trailing window over aligned pairs; positions before `lag` have
        // no benchmark counterpart.
        let start = i.saturating_sub(config.window - 1).max(config.lag);
        let (alpha, beta) = if i < config.lag || i + 1 - start < MIN_WINDOW_OBS {
            (None, None)
        } else {
            let s_win = &s[start..=i];
            let b_win: Vec<f64> = (start..=i).map(|j| b[j - config.lag]).collect();
            window_alpha_beta(s_win, &b_win)
        };
        out.push(RollingPoint { date, alpha, beta });
    }

    Ok(out)
}

fn window_alpha_beta(s_win: &[f64], b_win: &[f64]) -> (Option<f64>, Option<f64>) {
    match (
        mean(s_win),
        mean(b_win),
        sample_covariance(s_win, b_win),
        sample_variance(b_win),
    ) {
        (Some(mean_s), Some(mean_b), Some(cov), Some(var_b)) => {
            let beta = if var_b > 0.0 { cov / var_b } else { 0.0 };
            (Some(mean_s - beta * mean_b), Some(beta))
        }
        _ => (None, None),
    }
}

/// Generic trailing-window statistic with the shared warm-up policy.
///
/// For each position `i`, applies `stat` to the window
/// `[max(0, i-(window-1)), i]`, emitting `None` when the window holds fewer
/// than `min_obs` values or when `stat` itself is undefined there.
pub fn rolling_stat<F>(
    series: &DailySeries,
    window: usize,
    min_obs: usize,
    stat: F,
) -> Result<Vec<(NaiveDate, Option<f64>)>, EngineError>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    if window == 0 {
        return Err(EngineError::InvalidParameter(
            "window must be > 0".to_string(),
        ));
    }
    if series.is_empty() {
        return Err(EngineError::EmptyInput);
    }

    let values: Vec<f64> = series.values().collect();
    let mut out = Vec::with_capacity(values.len());
    for (i, date) in series.dates().enumerate() {
        let start = i.saturating_sub(window - 1);
        let win = &values[start..=i];
        let value = if win.len() < min_obs { None } else { stat(win) };
        out.push((date, value));
    }

    Ok(out)
}

/// Rolling mean with the standard warm-up minimum.
pub fn rolling_mean(
    series: &DailySeries,
    window: usize,
) -> Result<Vec<(NaiveDate, Option<f64>)>, EngineError> {
    rolling_stat(series, window, MIN_WINDOW_OBS, mean)
}
