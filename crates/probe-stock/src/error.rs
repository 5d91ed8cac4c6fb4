//! Error types for probe operations

use std::time::Duration;
use thiserror::Error;

/// Errors raised by data-source clients and probe helpers
///
/// Probes never return these to the driver; they are turned into failure
/// outcomes at the narrowest scope that produced them.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Yahoo Finance error
    #[error("Yahoo Finance error: {0}")]
    MarketData(String),

    /// Feed could not be fetched
    #[error("Feed error: {0}")]
    Feed(String),

    /// An outbound call did not finish in time
    #[error("{operation} timed out after {}s", after.as_secs())]
    Timeout {
        operation: String,
        after: Duration,
    },

    /// Technical indicator calculation error
    #[error("Technical indicator error: {0}")]
    Indicator(String),

    /// Data not available for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable {
        symbol: String,
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for probe operations
pub type Result<T> = std::result::Result<T, ProbeError>;

/// Convert anyhow::Error to ProbeError
impl From<anyhow::Error> for ProbeError {
    fn from(err: anyhow::Error) -> Self {
        ProbeError::Other(err.to_string())
    }
}

/// Await `fut`, giving up after `after`
pub(crate) async fn with_timeout<T, F>(operation: &str, after: Duration, fut: F) -> Result<T>
where
    F: std::future::Future<Output = Result<T>>,
{
    match tokio::time::timeout(after, fut).await {
        Ok(result) => result,
        Err(_) => Err(ProbeError::Timeout {
            operation: operation.to_string(),
            after,
        }),
    }
}
