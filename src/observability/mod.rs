//! Logging setup
//!
//! The library emits `tracing` events with key/value fields and never
//! installs a subscriber itself. Binaries call [`init_tracing`] once at
//! startup.
//!
//! # Usage
//!
//! ```ignore
//! use compliancekit::observability::{init_tracing, LogConfig, LogFormat};
//!
//! // From environment variables
//! init_tracing(&LogConfig::from_env())?;
//!
//! // Or programmatically
//! init_tracing(&LogConfig { format: LogFormat::Json, filter: "compliancekit=debug".into() })?;
//! ```

mod config;
mod providers;

use thiserror::Error;

pub use config::{LogConfig, LogFormat};
pub use providers::init_tracing;

/// Errors from subscriber installation
#[derive(Debug, Error)]
pub enum ObservabilityError {
    /// Invalid configuration
    #[error("Observability config error: {0}")]
    Config(String),

    /// Subscriber installation failed (usually: one is already installed)
    #[error("Observability provider error: {0}")]
    Provider(String),
}
