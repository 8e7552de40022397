//! Verity Eval - Batch evaluation of the fact-checking pipeline.

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use verity_eval::{evaluate, load_dataset, Cli, Formatter};
use verity_pipeline::{Pipeline, PipelineConfig};
use verity_server::capabilities::build_capabilities;
use verity_server::config::ServerConfig;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ServerConfig::default_config(),
    };

    // Evaluation uses the batch preset unless thresholds are given explicitly
    let pipeline_config = config.pipeline.clone().unwrap_or_else(PipelineConfig::batch);

    let records = load_dataset(&cli.dataset)
        .with_context(|| format!("loading dataset {}", cli.dataset.display()))?;

    let capabilities = build_capabilities(&config.providers)?;
    let pipeline = Pipeline::new(capabilities, pipeline_config)?;
    info!("Pipeline ready");

    let evaluation = evaluate(&pipeline, &records, cli.limit)?;

    let formatter = Formatter::new(cli.format, !cli.no_color);
    println!("{}", formatter.format_evaluation(&evaluation)?);

    Ok(())
}
