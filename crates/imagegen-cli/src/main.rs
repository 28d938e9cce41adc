//! Image Generator test client
//!
//! Sends one prompt to a running agent over `message/stream` and prints the
//! image record from each agent message.

use clap::Parser;
use futures::StreamExt;
use imagegen_cli::{extract_image_result, A2AClient, StreamEvent};
use imagegen_core::{init_logging, LogConfig};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "imagegen-cli", about = "Ask the Image Generator Agent for an image")]
struct Args {
    /// Base URL of the agent server
    #[arg(long, env = "IMAGEGEN_URL", default_value = "http://localhost:10001")]
    url: String,

    /// Prompt to send
    #[arg(long, default_value = "Generate an image of a cute cat.")]
    prompt: String,

    /// Log level or filter directive
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(LogConfig {
        level: args.log_level.clone(),
        json: false,
    });

    let client = A2AClient::new(&args.url);

    match client.agent_card().await {
        Ok(card) => tracing::info!("Connected to {} v{} at {}", card.name, card.version, card.url),
        Err(e) => {
            tracing::error!("Failed to fetch the agent card: {}", e);
            println!("Failed to complete the call {}", e);
            return ExitCode::FAILURE;
        }
    }

    let mut stream = match client.send_message_streaming(&args.prompt).await {
        Ok(stream) => stream,
        Err(e) => {
            tracing::error!("Failed to complete the call to the agent: {}", e);
            println!("Failed to complete the call {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut failed = false;
    while let Some(event) = stream.next().await {
        match event {
            Ok(StreamEvent::Message { text }) => {
                tracing::debug!("Agent message {}", text);
                match extract_image_result(&text) {
                    Ok(image) => {
                        println!("The response contains the following image data");
                        println!();
                        println!("    Name: {}", image.name);
                        println!("    Description: {}", image.description);
                        println!("    Path: {}", image.path);
                        println!();
                    }
                    Err(e) => {
                        tracing::error!("Returned value isn't an image record: {}", e);
                        failed = true;
                    }
                }
            }
            Ok(StreamEvent::Status {
                state,
                is_final,
                text,
            }) => {
                if state == "failed" {
                    tracing::error!("Agent task failed: {}", text.unwrap_or_default());
                    failed = true;
                } else {
                    tracing::info!("Task {} (final: {})", state, is_final);
                }
            }
            Err(e) => {
                tracing::error!("Failed to complete the call to the agent: {}", e);
                println!("Failed to complete the call {}", e);
                failed = true;
                break;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
