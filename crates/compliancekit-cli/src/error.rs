//! Error types for the ComplianceKit CLI

use std::path::PathBuf;
use thiserror::Error;

use compliancekit::ConfigError;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Refusing to overwrite an existing configuration
    #[error("{path} already exists. Use --force to overwrite.")]
    ConfigExists { path: PathBuf },

    /// Loading the configuration or building the profile failed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
