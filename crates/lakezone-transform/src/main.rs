//! Lakezone Transform - raw zone to processed zone batch job

use anyhow::Result;
use clap::Parser;
use lakezone_common::logging::{init_logging, LogConfig, LogLevel};
use lakezone_common::storage::{Storage, StorageConfig};
use lakezone_transform::pipeline::{TransformOptions, TransformPipeline};
use lakezone_transform::reader::RawZoneReader;
use lakezone_transform::writer::ProcessedZoneWriter;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "lakezone-transform")]
#[command(author, version, about = "Transform one raw zone table into partitioned Parquet")]
struct Cli {
    /// Raw zone bucket to read from
    #[arg(long, env = "RAW_BUCKET", default_value = "data-lake-raw")]
    source_bucket: String,

    /// Optional database namespace prepended to the table prefix
    #[arg(long)]
    source_database: Option<String>,

    /// Table name, the key prefix of the landed objects
    #[arg(long)]
    source_table: String,

    /// Processed zone bucket to write to
    #[arg(long, env = "PROCESSED_BUCKET", default_value = "data-lake-processed")]
    target_bucket: String,

    /// Key prefix in the processed zone, defaults to the table name
    #[arg(long)]
    target_prefix: Option<String>,

    /// Field used for dedup identity and the required-key drop
    #[arg(long, default_value = "id")]
    key_field: String,

    /// Field used for dedup recency and date partitioning
    #[arg(long, default_value = "timestamp")]
    event_time_field: String,

    /// Run identifier stamped into the audit columns
    #[arg(long, env = "LAKEZONE_RUN_ID")]
    run_id: Option<String>,

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
        .with_file_prefix("lakezone-transform");
    init_logging(&log_config)?;

    let source_prefix = match &cli.source_database {
        Some(database) => format!("{}/{}", database, cli.source_table),
        None => cli.source_table.clone(),
    };
    let target_prefix = cli
        .target_prefix
        .clone()
        .unwrap_or_else(|| source_prefix.clone());

    info!(
        source_bucket = %cli.source_bucket,
        source_prefix = %source_prefix,
        target_bucket = %cli.target_bucket,
        target_prefix = %target_prefix,
        "Starting transform"
    );

    let raw = Storage::new(StorageConfig::from_env_for_bucket(&cli.source_bucket)?).await?;
    let processed = Storage::new(StorageConfig::from_env_for_bucket(&cli.target_bucket)?).await?;

    let options = TransformOptions {
        key_field: cli.key_field,
        event_time_field: cli.event_time_field,
        run_id: cli.run_id,
    };

    let pipeline = TransformPipeline::new(
        RawZoneReader::new(Arc::new(raw), source_prefix),
        ProcessedZoneWriter::new(Arc::new(processed), target_prefix),
        options,
    );

    let report = pipeline.run().await?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
