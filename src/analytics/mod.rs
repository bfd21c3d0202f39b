//! Analytics components.
//!
//! Each submodule is one pure, synchronous transform from a batch of
//! observations (or aligned series) to a small structured result:
//!
//! - [`buckets`] — cross-sectional decile/quintile ranking
//! - [`ic`] — Spearman rank correlation (information coefficient)
//! - [`rolling`] — trailing-window mean/variance/OLS alpha-beta
//! - [`bootstrap`] — resampling confidence intervals and histograms
//! - [`expectancy`] — direction-filtered per-symbol average outcomes

pub mod bootstrap;
pub mod buckets;
pub mod expectancy;
pub mod ic;
pub mod rolling;

pub use bootstrap::{BootstrapConfig, bootstrap_mean};
pub use buckets::{BucketConfig, RankOrder, bucket_by_date, bucket_by_score, bucket_global};
pub use expectancy::{ExpectancyConfig, symbol_expectancy};
pub use ic::{daily_ic, grouped_ic, select_top_bottom};
pub use rolling::{MIN_WINDOW_OBS, RollingConfig, rolling_alpha_beta, rolling_mean, rolling_stat};
