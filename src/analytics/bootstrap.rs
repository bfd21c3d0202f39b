//! Bootstrap confidence intervals for a daily scalar statistic.
//!
//! The classic resampling scheme: draw `n` values with replacement from the
//! observed sample, average them, repeat `B` times, and read the empirical
//! percentiles of the `B` means. This is the only non-deterministic
//! component in the engine, so the random source is an explicit argument —
//! tests pass a seeded `StdRng` and get byte-identical output.

use rand::Rng;
use tracing::debug;

use crate::domain::{BootstrapSummary, HistogramBin};
use crate::error::EngineError;

/// Guard against a zero-width histogram range when all means coincide.
const RANGE_EPSILON: f64 = 1e-12;

/// Resampling parameters.
#[derive(Debug, Clone, Copy)]
pub struct BootstrapConfig {
    /// Number of resampling iterations `B`.
    pub samples: usize,
    /// Number of equal-width histogram bins over the observed mean range.
    pub bins: usize,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            samples: 2000,
            bins: 20,
        }
    }
}

/// Bootstrap the sampling distribution of the mean of `values`.
///
/// Reports the average of the `B` resampled means, their empirical 0.5th
/// and 99.5th percentiles (a 99% two-sided confidence interval), and an
/// equal-width histogram of the means.
pub fn bootstrap_mean(
    values: &[f64],
    config: &BootstrapConfig,
    rng: &mut impl Rng,
) -> Result<BootstrapSummary, EngineError> {
    if values.is_empty() {
        return Err(EngineError::EmptyInput);
    }
    if config.samples == 0 {
        return Err(EngineError::InvalidParameter(
            "bootstrap sample count must be > 0".to_string(),
        ));
    }
    if config.bins == 0 {
        return Err(EngineError::InvalidParameter(
            "histogram bin count must be > 0".to_string(),
        ));
    }

    let n = values.len();
    let b = config.samples;
    debug!(n, samples = b, bins = config.bins, "bootstrap resampling");

    let mut means = Vec::with_capacity(b);
    for _ in 0..b {
        let mut sum = 0.0;
        for _ in 0..n {
            sum += values[rng.gen_range(0..n)];
        }
        means.push(sum / n as f64);
    }
    means.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mean = means.iter().sum::<f64>() / b as f64;

    // Empirical 99% two-sided interval, indices clamped to valid bounds.
    let lower_idx = ((0.005 * b as f64).floor() as usize).min(b - 1);
    let upper_idx = ((0.995 * b as f64).ceil() as usize).min(b - 1);
    let ci_lower = means[lower_idx];
    let ci_upper = means[upper_idx];

    Ok(BootstrapSummary {
        mean,
        ci_lower,
        ci_upper,
        histogram: build_histogram(&means, config.bins),
    })
}

/// Bucket sorted `means` into `bins` equal-width bins between min and max.
fn build_histogram(means: &[f64], bins: usize) -> Vec<HistogramBin> {
    let min = means[0];
    let max = means[means.len() - 1];
    let width = (max - min + RANGE_EPSILON) / bins as f64;

    let mut counts = vec![0_usize; bins];
    for &m in means {
        let idx = (((m - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            center: min + width * (i as f64 + 0.5),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn constant_input_collapses_interval_to_the_value() {
        let values = vec![0.5; 50];
        let mut rng = StdRng::seed_from_u64(7);

        let summary = bootstrap_mean(&values, &BootstrapConfig::default(), &mut rng).unwrap();
        assert_eq!(summary.mean, 0.5);
        assert_eq!(summary.ci_lower, 0.5);
        assert_eq!(summary.ci_upper, 0.5);
        // Every mean lands in one bin; total count is preserved.
        assert_eq!(summary.histogram.iter().map(|b| b.count).sum::<usize>(), 2000);
    }

    #[test]
    fn same_seed_reproduces_the_summary() {
        let values: Vec<f64> = (0..40).map(|i| (i as f64 * 1.3).sin()).collect();
        let config = BootstrapConfig::default();

        let a = bootstrap_mean(&values, &config, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = bootstrap_mean(&values, &config, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn interval_brackets_the_sample_mean() {
        let values: Vec<f64> = (0..60).map(|i| ((i * 37) % 11) as f64 - 5.0).collect();
        let sample_mean = values.iter().sum::<f64>() / values.len() as f64;
        let mut rng = StdRng::seed_from_u64(3);

        let summary = bootstrap_mean(&values, &BootstrapConfig::default(), &mut rng).unwrap();
        assert!(summary.ci_lower <= summary.ci_upper);
        assert!(summary.ci_lower <= sample_mean && sample_mean <= summary.ci_upper);
        // The bootstrap mean should be close to the sample mean.
        assert!((summary.mean - sample_mean).abs() < 0.5);
    }

    #[test]
    fn histogram_spans_the_mean_range_and_counts_everything() {
        let values: Vec<f64> = (0..30).map(|i| i as f64 / 10.0).collect();
        let config = BootstrapConfig {
            samples: 500,
            bins: 12,
        };
        let mut rng = StdRng::seed_from_u64(11);

        let summary = bootstrap_mean(&values, &config, &mut rng).unwrap();
        assert_eq!(summary.histogram.len(), 12);
        assert_eq!(summary.histogram.iter().map(|b| b.count).sum::<usize>(), 500);
        // Bin centers are strictly increasing.
        for w in summary.histogram.windows(2) {
            assert!(w[0].center < w[1].center);
        }
    }

    #[test]
    fn empty_input_and_zero_parameters_are_rejected() {
        let mut rng = StdRng::seed_from_u64(0);

        let err = bootstrap_mean(&[], &BootstrapConfig::default(), &mut rng).unwrap_err();
        assert!(matches!(err, EngineError::EmptyInput));

        let err = bootstrap_mean(
            &[1.0],
            &BootstrapConfig { samples: 0, bins: 20 },
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter(_)));

        let err = bootstrap_mean(
            &[1.0],
            &BootstrapConfig { samples: 10, bins: 0 },
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter(_)));
    }
}
