//! Verity Server CLI
//!
//! Loads configuration, builds the pipeline once, and serves it over HTTP.

use std::env;
use std::process;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use verity_server::{build_pipeline, config::ServerConfig, start_server, ServerError};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), ServerError> {
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        ServerConfig::from_file(&args[2])?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        eprintln!("Warning: No config file specified, using default configuration");
        eprintln!("Usage: verity-server --config <path-to-config.toml>");
        eprintln!();
        ServerConfig::default_config()
    };

    // Providers own blocking HTTP clients, which must not be created or
    // dropped on a runtime thread.
    let pipeline = Arc::new(build_pipeline(&config)?);
    info!("Pipeline ready");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| ServerError::Server(format!("Failed to start runtime: {}", e)))?;
    let result = runtime.block_on(start_server(config, pipeline.clone()));
    drop(runtime);

    drop(pipeline);
    info!("Models and clients released");
    result
}

fn print_help() {
    println!("Verity Server - Automated Fact-Checking Service");
    println!();
    println!("USAGE:");
    println!("    verity-server --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("EXAMPLE:");
    println!("    verity-server --config config/server.toml");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file may contain:");
    println!("    - bind_address: IP address to bind (default: '127.0.0.1')");
    println!("    - bind_port: Port number (default: 5000)");
    println!("    - mode: 'interactive' or 'batch' preset");
    println!("    - [pipeline]: explicit thresholds overriding the preset");
    println!("    - [providers]: model server, Ollama and Wikidata endpoints");
    println!();
    println!("ENVIRONMENT:");
    println!("    GOOGLE_API_KEY, GOOGLE_CSE_ID    Custom Search credentials");
    println!("    RUST_LOG                         Log filter (default: info)");
    println!();
}
