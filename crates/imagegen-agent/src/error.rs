//! Error types for the agent runtime

use imagegen_core::CoreError;
use imagegen_llm::LLMError;
use imagegen_tools::ToolError;

/// Result type for agent runtime operations
pub type Result<T> = std::result::Result<T, AgentRuntimeError>;

/// Errors that can occur during agent execution
#[derive(Debug, thiserror::Error)]
pub enum AgentRuntimeError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    LLM(#[from] LLMError),

    /// Tool execution error
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// Max iterations exceeded
    #[error("Max iterations exceeded: {0}")]
    MaxIterationsExceeded(usize),

    /// Tool call parsing error
    #[error("Failed to parse tool call: {0}")]
    ToolCallParse(String),

    /// The final answer was not an image record
    #[error("Failed to parse agent output: {0}")]
    OutputParse(String),

    /// The incoming request cannot be served
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Operation not supported by this agent
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Agent not configured properly
    #[error("Agent configuration error: {0}")]
    Configuration(String),

    /// Generic error from imagegen-core
    #[error(transparent)]
    CoreError(#[from] CoreError),
}

impl AgentRuntimeError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Self::ToolCallParse(msg.into())
    }

    pub fn output<S: Into<String>>(msg: S) -> Self {
        Self::OutputParse(msg.into())
    }

    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        Self::Unsupported(msg.into())
    }
}
