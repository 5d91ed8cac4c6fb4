//! Shared utilities for stock-probe
//!
//! This crate provides common functionality used across the stock-probe workspace,
//! currently logging setup and the configuration that drives it.

pub mod config;
pub mod logging;

pub use config::{LogConfig, LogFormat};
pub use logging::{init_tracing, init_tracing_with};
