//! Image Creation Agent
//!
//! Ties an LLM provider and the image generation tool together: the model
//! reads the user's request, picks a name for the image, calls the tool,
//! and answers with an [`ImageResult`](imagegen_tools::ImageResult).
//!
//! # Example
//!
//! ```no_run
//! use imagegen_agent::ImageAgent;
//! use imagegen_core::GenerationConfig;
//! use imagegen_llm::OpenAIProvider;
//! use imagegen_tools::{builtin::ImageGenerationTool, ImageGenerator, ToolRegistry};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = OpenAIProvider::new("gemma3:4b").with_base_url("http://127.0.0.1:11434/v1");
//!     let tools = ToolRegistry::new();
//!     tools.register(ImageGenerationTool::new(ImageGenerator::with_http(
//!         GenerationConfig::from_env()?,
//!     )))?;
//!
//!     let agent = ImageAgent::builder().provider(provider).tools(tools).build()?;
//!     let image = agent.invoke("A cute cat", "session-1").await?;
//!     println!("{} saved at {}", image.name, image.path);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod error;
pub mod executor;
pub mod parser;

// Re-exports
pub use agent::{AgentConfig, ImageAgent, ImageAgentBuilder, SUPPORTED_CONTENT_TYPES};
pub use error::{AgentRuntimeError, Result};
pub use executor::{AgentExecutor, AgentReply, ImageAgentExecutor, RequestContext};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        let _ = std::mem::size_of::<ImageAgent>();
        assert_eq!(AgentConfig::default().max_iterations, 3);
    }
}
