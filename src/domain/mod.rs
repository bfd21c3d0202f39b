//! Domain types used throughout the engine.
//!
//! This module defines:
//!
//! - the input row shape (`Observation`) and ordered series (`DailySeries`)
//! - request parameters shared across analytics (`Direction`)
//! - structured result rows (`BucketResult`, `RankStat`, `RollingPoint`,
//!   `BootstrapSummary`, `SymbolExpectancy`, `TopBottom`)

pub mod types;

pub use types::*;
