//! Core abstractions for stock-probe
//!
//! This crate defines the types shared by every health probe: the [`Probe`]
//! trait, the typed [`CheckOutcome`] each sub-check produces, and the
//! [`ProbeReport`] / [`RunReport`] aggregates that renderers consume.

pub mod error;
pub mod probe;
pub mod report;
pub mod status;

pub use error::{Error, Result};
pub use probe::Probe;
pub use report::{ProbeReport, ProbeReportBuilder, RunReport, StatusTotals};
pub use status::{CheckOutcome, CheckStatus, OutcomeReason};
