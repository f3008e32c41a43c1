//! Error types for emitter construction and configuration.
//!
//! Registration, removal and emission never fail; these errors only come out
//! of loading configuration and building an emitter from it.

/// Errors raised while configuring or constructing an [`Emitter`](crate::Emitter).
#[derive(Debug, thiserror::Error)]
pub enum EmitterError {
    /// A configuration value is out of range
    #[error("Invalid emitter configuration: {0}")]
    InvalidConfig(String),

    /// Configuration text could not be parsed
    #[error("Configuration parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A tokio executor was requested outside of a tokio runtime
    #[error("Tokio runtime unavailable: {0}")]
    RuntimeUnavailable(String),
}

impl From<tokio::runtime::TryCurrentError> for EmitterError {
    fn from(err: tokio::runtime::TryCurrentError) -> Self {
        EmitterError::RuntimeUnavailable(err.to_string())
    }
}
