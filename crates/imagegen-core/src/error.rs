//! Error types shared by every imagegen crate
//!
//! Each downstream crate wraps [`CoreError`] in its own error enum.

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Configuration errors, including missing environment variables
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration parsing errors
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] config::ConfigError),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl CoreError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }
}
