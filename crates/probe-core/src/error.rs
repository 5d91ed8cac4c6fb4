//! Error types for probe-core

use thiserror::Error;

/// Result type alias for probe-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for report handling
#[derive(Error, Debug)]
pub enum Error {
    /// Report could not be serialized
    #[error("Report serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing rendered output failed
    #[error("Report output failed: {0}")]
    Output(#[from] std::io::Error),
}
