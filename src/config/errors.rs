//! # Config Errors

use thiserror::Error;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors. All are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Invalid(#[from] serde_json::Error),

    #[error("secret_key must be at least {min} bytes, got {actual}")]
    WeakSecret { min: usize, actual: usize },

    #[error("salt must not be empty")]
    EmptySalt,
}

impl ConfigError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "VG_CONFIG_READ",
            ConfigError::Invalid(_) => "VG_CONFIG_INVALID",
            ConfigError::WeakSecret { .. } => "VG_CONFIG_WEAK_SECRET",
            ConfigError::EmptySalt => "VG_CONFIG_INVALID",
        }
    }
}
