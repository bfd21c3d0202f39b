//! Scalar statistics shared by the analytics components.
//!
//! Kept separate so the components stay focused on partitioning and
//! selection logic while the numeric kernels live (and are tested) in one
//! place.

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance (n-1 denominator). `None` for fewer than two values.
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>();
    Some(ss / (values.len() - 1) as f64)
}

/// Sample covariance (n-1 denominator) of two equally long slices.
/// `None` for mismatched lengths or fewer than two pairs.
pub fn sample_covariance(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let mx = mean(xs)?;
    let my = mean(ys)?;
    let ss = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (x - mx) * (y - my))
        .sum::<f64>();
    Some(ss / (xs.len() - 1) as f64)
}

/// Standard competition ranks (ties share a rank; the next distinct value
/// skips past the tie group: `[10, 20, 20, 30]` -> `[1, 2, 2, 4]`).
///
/// Rank of `v` = number of values strictly smaller than `v`, plus one.
pub fn competition_ranks(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    values
        .iter()
        .map(|v| {
            let below = sorted.partition_point(|s| s < v);
            (below + 1) as f64
        })
        .collect()
}

/// Pearson correlation coefficient.
///
/// `None` when undefined: mismatched lengths, fewer than two pairs, or zero
/// variance on either side. Undefined is never coerced to zero.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let cov = sample_covariance(xs, ys)?;
    let var_x = sample_variance(xs)?;
    let var_y = sample_variance(ys)?;
    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }
    let r = cov / (var_x.sqrt() * var_y.sqrt());
    if r.is_finite() { Some(r) } else { None }
}

/// Spearman rank correlation: Pearson applied to competition-rank vectors.
pub fn spearman(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let rx = competition_ranks(xs);
    let ry = competition_ranks(ys);
    pearson(&rx, &ry)
}
