//! Error types for tool operations and image generation

use imagegen_core::CoreError;
use std::path::PathBuf;

/// Result type for tool operations
pub type Result<T> = std::result::Result<T, ToolError>;

/// Errors that can occur during tool operations
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Tool not found
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// Tool execution failed
    #[error("Tool execution failed: {0}")]
    ExecutionError(String),

    /// Invalid parameters
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Tool already registered
    #[error("Tool already registered: {0}")]
    AlreadyRegistered(String),

    /// Generic error from imagegen-core
    #[error(transparent)]
    CoreError(#[from] CoreError),
}

impl ToolError {
    /// Create an execution error
    pub fn execution<S: Into<String>>(msg: S) -> Self {
        Self::ExecutionError(msg.into())
    }

    /// Create an invalid parameters error
    pub fn invalid_params<S: Into<String>>(msg: S) -> Self {
        Self::InvalidParameters(msg.into())
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(tool_name: S) -> Self {
        Self::NotFound(tool_name.into())
    }
}

/// Why an image generation call failed
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Empty prompt or image name; raised before any I/O
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The request to the inference endpoint could not be completed
    #[error("Transport error: {0}")]
    Transport(String),

    /// The image could not be written
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The endpoint answered with something other than 200
    #[error("Inference endpoint returned status {status}")]
    UnexpectedStatus { status: u16 },
}

impl GenerationError {
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn transport<S: Into<String>>(msg: S) -> Self {
        Self::Transport(msg.into())
    }

    /// Stable machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Transport(_) => "transport",
            Self::Io { .. } => "io",
            Self::UnexpectedStatus { .. } => "unexpected_status",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = ToolError::not_found("image_generator");
        assert!(matches!(err, ToolError::NotFound(_)));
        assert_eq!(err.to_string(), "Tool not found: image_generator");
    }

    #[test]
    fn test_invalid_params() {
        let err = ToolError::invalid_params("missing field `prompt`");
        assert!(matches!(err, ToolError::InvalidParameters(_)));
    }

    #[test]
    fn test_generation_error_kinds() {
        assert_eq!(GenerationError::invalid_argument("x").kind(), "invalid_argument");
        assert_eq!(GenerationError::transport("x").kind(), "transport");
        assert_eq!(
            GenerationError::UnexpectedStatus { status: 503 }.kind(),
            "unexpected_status"
        );

        let io = GenerationError::Io {
            path: PathBuf::from("/tmp/x/sunset.png"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(io.kind(), "io");
        assert!(io.to_string().contains("/tmp/x/sunset.png"));
    }

    #[test]
    fn test_unexpected_status_message() {
        let err = GenerationError::UnexpectedStatus { status: 429 };
        assert_eq!(err.to_string(), "Inference endpoint returned status 429");
    }
}
