//! `signal-analytics` library crate.
//!
//! The quantitative core of the signals dashboard: everything that turns a
//! batch of `(instrument, date, predicted score, realized return)` rows into
//! summary statistics the HTTP layer can chart. The crate is deliberately a
//! pure library so that:
//!
//! - every analytic is testable without a database or web server
//! - the same code backs every endpoint that needs rankings or rolling stats
//! - the only non-determinism (bootstrap sampling) is injected, not ambient
//!
//! Transport, auth, billing, storage, and chart markup all live elsewhere;
//! callers hand us already-fetched rows and get plain structured data back.

pub mod analytics;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod stats;

pub use error::EngineError;
