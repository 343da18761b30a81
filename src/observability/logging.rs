//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber from `LoggingConfig`
//! - Let `RUST_LOG` override the configured filter
//!
//! # Design Decisions
//! - Logs go to stderr so stdout stays free for dispatched output
//! - JSON format for production, pretty or compact for development

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::{LogFormat, LoggingConfig};

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &LoggingConfig) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    let layer = match config.format {
        LogFormat::Pretty => fmt::layer().with_writer(std::io::stderr).pretty().boxed(),
        LogFormat::Compact => fmt::layer().with_writer(std::io::stderr).compact().boxed(),
        LogFormat::Json => fmt::layer().with_writer(std::io::stderr).json().boxed(),
    };

    tracing_subscriber::registry().with(layer).with(filter).try_init()
}
