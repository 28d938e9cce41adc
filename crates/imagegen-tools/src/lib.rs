//! Tool Calling System
//!
//! This crate provides the tool infrastructure for the image generator
//! agent, plus the image generation tool itself.
//!
//! # Example
//!
//! ```no_run
//! use imagegen_core::{GenerationConfig, RunMode};
//! use imagegen_tools::{builtin::ImageGenerationTool, ImageGenerator, ToolRegistry};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GenerationConfig::new("/tmp/images", "hf_token", RunMode::Simulated);
//!     let registry = ToolRegistry::new();
//!     registry.register(ImageGenerationTool::new(ImageGenerator::with_http(config)))?;
//!
//!     let result = registry
//!         .execute(
//!             "image_generator",
//!             json!({"prompt": "a red fox", "session_id": "s1", "image_name": "fox"}),
//!         )
//!         .await?;
//!     println!("{:?}", result);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod image;
pub mod registry;
pub mod schema;
pub mod tool;

// Built-in tools
pub mod builtin;

// Re-exports
pub use error::{GenerationError, Result, ToolError};
pub use image::{
    target_path, GenerationOutcome, HttpImageTransport, ImageGenerator, ImageRequest,
    ImageResult, ImageTransport, TransportResponse,
};
pub use registry::ToolRegistry;
pub use schema::ToolSchema;
pub use tool::{Tool, ToolResult};
