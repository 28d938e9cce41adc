//! Image Tool Demo
//!
//! Runs the image generation tool through a registry. Uses `ENV`,
//! `SAVE_PATH` and `HF_TOKEN` from the environment (or `.env`); with
//! `ENV` set to anything but `prod` no request is sent.
//!
//! Run with:
//! ```bash
//! ENV=dev SAVE_PATH=/tmp HF_TOKEN=unused cargo run -p imagegen-tools --example image_tool_demo
//! ```

use imagegen_core::{init_logging, GenerationConfig, LogConfig};
use imagegen_tools::{builtin::ImageGenerationTool, ImageGenerator, ToolRegistry};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LogConfig {
        level: "debug".to_string(),
        json: false,
    });

    let config = GenerationConfig::from_env()?;
    println!("Mode: {:?}", config.mode);

    let registry = ToolRegistry::new();
    registry.register(ImageGenerationTool::new(ImageGenerator::with_http(config)))?;

    for name in registry.list_tools() {
        if let Some(tool) = registry.get_tool(&name) {
            println!("  • {}: {}", tool.name(), tool.description());
        }
    }

    let result = registry
        .execute(
            "image_generator",
            json!({
                "prompt": "A photorealistic glass of raspberry lemonade",
                "session_id": "demo",
                "image_name": "raspberry_lemonade",
            }),
        )
        .await?;

    if result.success {
        println!("✅ {}", serde_json::to_string_pretty(&result.data)?);
    } else {
        println!(
            "❌ {} ({})",
            result.error.unwrap_or_default(),
            result.error_kind.unwrap_or_default()
        );
    }

    Ok(())
}
