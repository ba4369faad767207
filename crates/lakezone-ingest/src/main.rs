//! Lakezone Ingest - raw zone landing tool

use anyhow::Result;
use clap::Parser;
use lakezone_common::logging::{init_logging, LogConfig, LogLevel};
use lakezone_common::storage::{Storage, StorageConfig};
use lakezone_ingest::config::SourceProvider;
use lakezone_ingest::fetcher::Fetcher;
use lakezone_ingest::landing::LandingWriter;
use lakezone_ingest::orchestrator::{IngestOrchestrator, IngestStatus, DEFAULT_CONCURRENCY};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "lakezone-ingest")]
#[command(author, version, about = "Fetch configured sources and land them in the raw zone")]
struct Cli {
    /// Path to the source registry JSON file
    #[arg(short, long, env = "LAKEZONE_SOURCES")]
    sources: PathBuf,

    /// Raw zone bucket
    #[arg(short, long, env = "RAW_BUCKET", default_value = "data-lake-raw")]
    bucket: String,

    /// Process only this source
    #[arg(long)]
    source: Option<String>,

    /// Number of sources processed concurrently
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::from_env()
        .unwrap_or_default()
        .with_level(log_level)
        .with_file_prefix("lakezone-ingest");
    init_logging(&log_config)?;

    info!(bucket = %cli.bucket, sources = %cli.sources.display(), "Starting ingestion");

    let storage = Storage::new(StorageConfig::from_env_for_bucket(&cli.bucket)?).await?;
    let orchestrator = IngestOrchestrator::new(
        Fetcher::new()?,
        LandingWriter::new(Arc::new(storage)),
        cli.concurrency,
    );

    let provider = SourceProvider::File(cli.sources);
    let report = orchestrator.run(&provider, cli.source.as_deref()).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    match report.status() {
        IngestStatus::Success => Ok(()),
        IngestStatus::Partial => std::process::exit(2),
        // run() returns Err before a report exists for fatal failures
        IngestStatus::Failed => std::process::exit(1),
    }
}
