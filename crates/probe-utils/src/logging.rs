//! Logging and tracing utilities

use crate::config::{LogConfig, LogFormat};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing subscriber with default configuration
pub fn init_tracing() {
    init_tracing_with(&LogConfig::default().with_env_format());
}

/// Initialize tracing subscriber from a [`LogConfig`]
///
/// Log lines go to stderr so that reports written to stdout stay clean.
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_tracing_with(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_directive));

    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    if let Err(e) = result {
        tracing::debug!("Tracing already initialized: {e}");
    }
}
