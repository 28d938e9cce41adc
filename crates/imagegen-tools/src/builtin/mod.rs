//! Built-in tools

pub mod image_generation;

pub use image_generation::{ImageGenerationTool, IMAGE_TOOL_NAME};
