//! Image Generator Agent server binary

use anyhow::Context;
use clap::Parser;
use imagegen_agent::{ImageAgent, ImageAgentExecutor, SUPPORTED_CONTENT_TYPES};
use imagegen_core::{init_logging, load_config, AppConfig, GenerationConfig, LogConfig};
use imagegen_llm::provider_from_settings;
use imagegen_server::{router, AgentCard, AppState};
use imagegen_tools::{builtin::ImageGenerationTool, ImageGenerator, ToolRegistry};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "imagegen-server", about = "Image Generator Agent (A2A)")]
struct Args {
    /// Address to bind [default: localhost]
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on [default: 10001]
    #[arg(long)]
    port: Option<u16>,

    /// Optional configuration file (TOML, YAML or JSON)
    #[arg(long, env = "IMAGEGEN_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = args.config.as_deref().map(load_config).transpose();
    let log_config = match &config {
        Ok(Some(config)) => LogConfig::from(&config.logging),
        _ => LogConfig::default(),
    };
    init_logging(log_config);

    let result = match config {
        Ok(config) => run(args, config.unwrap_or_default()).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("An error occurred during server startup: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args, config: AppConfig) -> anyhow::Result<()> {
    let generation = GenerationConfig::from_env().context("loading generation settings")?;

    let tools = ToolRegistry::new();
    tools.register(ImageGenerationTool::new(ImageGenerator::with_http(generation)))?;

    let settings = &config.agent;
    let provider = provider_from_settings(settings)?;
    tracing::info!("Using {} model {}", provider.name(), provider.model());

    let agent = ImageAgent::builder()
        .provider_dyn(provider)
        .tools(tools)
        .max_iterations(settings.max_iterations)
        .build()?;

    // Flags win over the [server] section
    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);

    let card = AgentCard::image_generator(&settings.name, &host, port, SUPPORTED_CONTENT_TYPES);
    let state = AppState::new(Arc::new(ImageAgentExecutor::new(agent)), card);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    tracing::info!("🚀 {} listening on http://{}", settings.name, addr);
    tracing::info!("  GET  /.well-known/agent.json - Agent card");
    tracing::info!("  POST /                       - JSON-RPC (message/send, message/stream, tasks/get, tasks/cancel)");
    tracing::info!("  GET  /health                 - Health check");

    axum::serve(listener, router(state)).await?;

    Ok(())
}
