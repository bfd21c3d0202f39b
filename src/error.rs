//! Error taxonomy for the analytics engine.
//!
//! Only two situations are hard failures: a bad parameter from the caller
//! and an upstream page fetch going wrong. Everything else (a group under
//! its minimum observation count, a warm-up window, zero variance in a
//! denominator) degrades to a well-defined `None` or exclusion inside the
//! result data instead of surfacing here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// No observations remain after filtering. Callers render an explicit
    /// empty state rather than a computed-but-meaningless statistic.
    #[error("no observations available after filtering")]
    EmptyInput,

    /// A caller-supplied parameter makes the requested analytic undefined
    /// (zero bucket count, zero page size, mismatched series lengths, ...).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A `DailySeries` was not strictly increasing by date.
    #[error("series is not ordered: {0}")]
    UnorderedSeries(String),

    /// A page request failed. The whole fetch aborts; no partial results.
    #[error("page fetch failed: {0}")]
    Fetch(String),
}
