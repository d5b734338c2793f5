use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::{LevelFilter, info, warn};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use kvault::config::Config;
use kvault::gateway::KnowledgeGateway;
use kvault::graph::ZepClient;
use kvault::mcp::McpServer;
use kvault::tools::{ToolCall, ToolRegistry};

mod cli;

use cli::Cli;
use cli::commands::Commands;

/// Level used until the config file has been read
const STARTUP_LOG_LEVEL: &str = "info";

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kvault")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("kvault.log");

    // stdout carries the protocol, so logs go to a file
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // Without RUST_LOG the filter admits everything and the global max level decides
    let env = env_logger::Env::default();
    let from_env = std::env::var(env_logger::DEFAULT_FILTER_ENV).is_ok();
    env_logger::Builder::from_env(env.default_filter_or("trace"))
        .target(env_logger::Target::Pipe(target))
        .init();
    if !from_env {
        log::set_max_level(parse_level(STARTUP_LOG_LEVEL).unwrap_or(LevelFilter::Info));
    }

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn parse_level(level: &str) -> Option<LevelFilter> {
    level.parse().ok()
}

/// Apply the configured level unless RUST_LOG already set the filter
fn apply_log_level(config: &Config) {
    if std::env::var(env_logger::DEFAULT_FILTER_ENV).is_ok() {
        return;
    }
    let Some(level) = config.log_level.as_deref() else {
        return;
    };
    match parse_level(level) {
        Some(filter) => {
            log::set_max_level(filter);
            info!("Log level set to {} from config", filter);
        }
        None => warn!("Ignoring unknown log_level '{}' in config", level),
    }
}

fn build_registry(config: &Config) -> Result<Arc<ToolRegistry>> {
    let client = ZepClient::from_env(&config.graph.api_key_env, config.graph.zep_config())
        .context("Failed to create knowledge graph client")?;
    let gateway = Arc::new(KnowledgeGateway::new(Arc::new(client)));
    Ok(Arc::new(ToolRegistry::standard(gateway, &config.server.name)))
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        eprintln!("{}", "Verbose mode enabled".yellow());
    }

    let registry = build_registry(config)?;

    match &cli.command {
        None | Some(Commands::Serve) => handle_serve_command(registry, config).await,
        Some(Commands::Tools { json }) => handle_tools_command(&registry, *json),
        Some(Commands::Call { name, args }) => handle_call_command(&registry, name, args.as_deref()).await,
    }
}

async fn handle_serve_command(registry: Arc<ToolRegistry>, config: &Config) -> Result<()> {
    let server = McpServer::new(registry, config.server.server_info());
    info!("Serving '{}' over stdio", server.info().name);
    server.run_stdio().await.context("MCP server failed")?;
    Ok(())
}

fn handle_tools_command(registry: &ToolRegistry, json: bool) -> Result<()> {
    let definitions = registry.definitions();

    if json {
        println!("{}", serde_json::to_string_pretty(&definitions)?);
        return Ok(());
    }

    println!("{}", "Available tools:".cyan());
    for def in definitions {
        println!("  {} - {}", def.name.green().bold(), def.description);
    }
    Ok(())
}

async fn handle_call_command(registry: &ToolRegistry, name: &str, args: Option<&str>) -> Result<()> {
    let arguments: Value = match args {
        Some(raw) => serde_json::from_str(raw).context("Tool arguments must be valid JSON")?,
        None => Value::Object(Default::default()),
    };

    info!("Calling tool: {}", name);
    let output = registry
        .dispatch(&ToolCall::new(name, arguments))
        .await
        .context(format!("Tool call '{}' failed", name))?;

    match output.to_value() {
        Value::String(text) => println!("{}", text),
        value => println!("{}", serde_json::to_string_pretty(&value)?),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    setup_logging().context("Failed to setup logging")?;

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    apply_log_level(&config);

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
