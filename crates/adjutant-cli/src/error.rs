//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pipeline error
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] adjutant_pipeline::PipelineError),

    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] adjutant_store::StoreError),

    /// Source error
    #[error("Source error: {0}")]
    Source(#[from] adjutant_sources::SourceError),

    /// Workspace sync error
    #[error("Workspace error: {0}")]
    Sync(#[from] adjutant_sync::SyncError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A required environment variable is missing
    #[error("Environment variable not set: {0}")]
    MissingEnv(String),
}
