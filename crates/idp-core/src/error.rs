//! Configuration error types.

use thiserror::Error;

/// Errors raised while loading connection settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting is absent or empty.
    #[error("missing required setting: {0}")]
    Missing(&'static str),

    /// A setting is present but cannot be parsed.
    #[error("invalid value for {key}: {message}")]
    Invalid {
        /// Setting name.
        key: &'static str,
        /// Parse failure description.
        message: String,
    },
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
