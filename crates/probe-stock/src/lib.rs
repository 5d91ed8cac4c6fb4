//! Connectivity probes for the data sources of an NSE stock analysis system
//!
//! This crate checks, one dependency at a time, that everything the analysis
//! system relies on is reachable and behaves:
//!
//! - Market data from Yahoo Finance (metadata, latest price, one-year
//!   history, valuation fields) for a list of `.NS` symbols
//! - Finance news RSS/Atom feeds
//! - The NewsAPI search endpoint (optional, needs a key)
//! - The `ta` technical-indicator library, over a synthetic OHLCV series
//! - Two sentiment scorers (VADER and AFINN-165)
//!
//! Every sub-check produces a typed [`CheckOutcome`](probe_core::CheckOutcome);
//! no failure ever escapes the probe that hit it.
//!
//! # Example
//!
//! ```rust,no_run
//! use probe_stock::{ConsoleRenderer, HealthCheckConfig, HealthChecker};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = HealthCheckConfig::default().with_env_api_key();
//!     let key = config.news_api_key.clone();
//!     let checker = HealthChecker::standard(&config, key)?;
//!
//!     let mut renderer = ConsoleRenderer::new(std::io::stdout());
//!     let run = checker.run_rendered(&mut renderer).await;
//!     println!("{} failures", run.totals().failure);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod checker;
pub mod config;
pub mod credentials;
pub mod error;
pub mod probes;
pub mod render;
pub mod series;
pub mod synthetic;

// Re-export main types for convenience
pub use checker::HealthChecker;
pub use config::{FeedTarget, HealthCheckConfig, NewsApiSettings, format_nse_symbol};
pub use credentials::{PromptPolicy, resolve_news_api_key, stdin_prompter};
pub use error::{ProbeError, Result};
pub use render::{ConsoleRenderer, JsonRenderer, Renderer};
pub use series::Bar;
