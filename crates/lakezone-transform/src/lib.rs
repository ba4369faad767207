//! Lakezone Transform Library
//!
//! Reads landed payloads from the raw zone and produces the processed
//! zone: deduplicated, normalized, audit-annotated records written as
//! date-partitioned Parquet.
//!
//! The stages run in a fixed order over one full batch: dedup, then
//! normalize, then annotate, then partition, then the partitioned write.
//!
//! # Example
//!
//! ```no_run
//! use lakezone_transform::pipeline::{TransformOptions, TransformPipeline};
//! use lakezone_transform::reader::RawZoneReader;
//! use lakezone_transform::writer::ProcessedZoneWriter;
//! use lakezone_common::storage::{Storage, StorageConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let raw = Arc::new(Storage::new(StorageConfig::from_env_for_bucket("data-lake-raw")?).await?);
//!     let processed =
//!         Arc::new(Storage::new(StorageConfig::from_env_for_bucket("data-lake-processed")?).await?);
//!
//!     let pipeline = TransformPipeline::new(
//!         RawZoneReader::new(raw, "orders"),
//!         ProcessedZoneWriter::new(processed, "orders"),
//!         TransformOptions::default(),
//!     );
//!     let report = pipeline.run().await?;
//!     tracing::info!(rows = report.rows_written, "done");
//!     Ok(())
//! }
//! ```

pub mod annotate;
pub mod dedupe;
pub mod error;
pub mod normalize;
pub mod partition;
pub mod pipeline;
pub mod reader;
pub mod record;
pub mod writer;

pub use error::{Result, TransformError};
