//! urlsift server CLI
//!
//! Starts the HTTP extraction service.

use anyhow::Context;
use std::env;
use std::process;
use tracing_subscriber::EnvFilter;
use urlsift_server::{config::ServerConfig, start_server};

#[tokio::main]
async fn main() {
    // Log to stderr, level from RUST_LOG
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut config = if args.len() > 2 && args[1] == "--config" {
        let config_path = &args[2];
        ServerConfig::from_file(config_path)
            .with_context(|| format!("loading {}", config_path))?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        return Ok(());
    } else {
        eprintln!("Warning: No config file specified, using defaults and environment");
        eprintln!("Usage: urlsift-server --config <path-to-config.toml>");
        eprintln!();
        toml::from_str::<ServerConfig>("").context("building default configuration")?
    };

    config.apply_env(|key| env::var(key).ok());
    config.validate()?;

    start_server(config).await?;
    Ok(())
}

fn print_help() {
    println!("urlsift server - LLM extraction over HTTP");
    println!();
    println!("USAGE:");
    println!("    urlsift-server --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    OPENROUTER_API_KEY     API key, selects OpenRouter");
    println!("    OPENAI_API_KEY         API key, selects OpenAI");
    println!("    URLSIFT_LLM_MODEL      Model override");
    println!("    URLSIFT_LLM_BASE_URL   Base URL override");
    println!("    RUST_LOG               Log filter (default: info)");
    println!();
    println!("ENDPOINTS:");
    println!("    GET  /health           Service health");
    println!("    GET  /metrics          Prometheus metrics");
    println!("    GET  /route?url=       Routing decision for a URL");
    println!("    POST /extract          Extract with the URL's strategy");
    println!("    POST /extract/all      Extract with every routed extractor");
    println!();
}
