//! Cross-sectional percentile bucketing.
//!
//! Observations are partitioned (globally, per date, or by any caller
//! supplied key), sorted by score within each partition, and split into `K`
//! contiguous buckets by position — the explicit reimplementation of an SQL
//! `NTILE`: when the partition size is not divisible by `K`, the remainder
//! rows land in the lowest-index buckets.
//!
//! Ties in score keep their original row order (stable sort), so bucket
//! assignment is reproducible across runs on identical input.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{BucketResult, Observation};
use crate::error::EngineError;

/// Sort direction for the score ranking.
///
/// `Descending` inverts the ordering for "short" semantics: the best short
/// candidates (most negative scores) land in bucket 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankOrder {
    Ascending,
    Descending,
}

/// Bucketing parameters.
#[derive(Debug, Clone, Copy)]
pub struct BucketConfig {
    /// Number of buckets `K` (10 = deciles, 5 = quintiles).
    pub buckets: usize,
    pub order: RankOrder,
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            buckets: 10,
            order: RankOrder::Ascending,
        }
    }
}

/// Bucket observations by score within partitions produced by `partition`,
/// then merge per-bucket outcome means and counts across partitions.
///
/// Rows missing `score` or `outcome` are dropped up front. Output always
/// contains exactly `K` entries ordered by bucket index; a bucket no row
/// landed in has `count == 0` and `mean_outcome == None`.
pub fn bucket_by_score<P, F>(
    observations: &[Observation],
    partition: F,
    config: &BucketConfig,
) -> Result<Vec<BucketResult>, EngineError>
where
    P: Ord,
    F: Fn(&Observation) -> P,
{
    let k = config.buckets;
    if k == 0 {
        return Err(EngineError::InvalidParameter(
            "bucket count must be > 0".to_string(),
        ));
    }

    // Partition complete rows, preserving input order within each partition.
    let mut partitions: BTreeMap<P, Vec<(f64, f64)>> = BTreeMap::new();
    for obs in observations {
        let (Some(score), Some(outcome)) = (obs.score, obs.outcome) else {
            continue;
        };
        partitions.entry(partition(obs)).or_default().push((score, outcome));
    }

    if partitions.is_empty() {
        return Err(EngineError::EmptyInput);
    }

    let mut outcome_sums = vec![0.0_f64; k];
    let mut counts = vec![0_usize; k];

    for rows in partitions.values_mut() {
        // Stable sort keeps original row order among tied scores.
        match config.order {
            RankOrder::Ascending => {
                rows.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
            }
            RankOrder::Descending => {
                rows.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal))
            }
        }

        let n = rows.len();
        for (pos, (_, outcome)) in rows.iter().enumerate() {
            let bucket = ((pos * k) / n).min(k - 1);
            outcome_sums[bucket] += outcome;
            counts[bucket] += 1;
        }
    }

    debug!(
        partitions = partitions.len(),
        buckets = k,
        rows = counts.iter().sum::<usize>(),
        "bucketed observations"
    );

    Ok((0..k)
        .map(|i| BucketResult {
            bucket: i + 1,
            mean_outcome: if counts[i] > 0 {
                Some(outcome_sums[i] / counts[i] as f64)
            } else {
                None
            },
            count: counts[i],
        })
        .collect())
}

/// Bucket all observations as one global partition.
pub fn bucket_global(
    observations: &[Observation],
    config: &BucketConfig,
) -> Result<Vec<BucketResult>, EngineError> {
    bucket_by_score(observations, |_| (), config)
}

/// Bucket observations cross-sectionally within each date.
pub fn bucket_by_date(
    observations: &[Observation],
    config: &BucketConfig,
) -> Result<Vec<BucketResult>, EngineError> {
    bucket_by_score(observations, |obs| obs.date, config)
}
