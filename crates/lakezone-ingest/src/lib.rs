//! Lakezone Ingest Library
//!
//! Fetches payloads from configured HTTP sources and lands them in the
//! raw zone of the object store, one object per source per run, under a
//! deterministic time-partitioned key.
//!
//! # Example
//!
//! ```no_run
//! use lakezone_ingest::config::SourceProvider;
//! use lakezone_ingest::fetcher::Fetcher;
//! use lakezone_ingest::landing::LandingWriter;
//! use lakezone_ingest::orchestrator::IngestOrchestrator;
//! use lakezone_common::storage::{Storage, StorageConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let storage = Storage::new(StorageConfig::from_env_for_bucket("data-lake-raw")?).await?;
//!     let orchestrator = IngestOrchestrator::new(
//!         Fetcher::new()?,
//!         LandingWriter::new(Arc::new(storage)),
//!         4,
//!     );
//!     let provider = SourceProvider::File("sources.json".into());
//!     let report = orchestrator.run(&provider, None).await?;
//!     tracing::info!(successful = report.successes.len(), "done");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod fetcher;
pub mod landing;
pub mod orchestrator;

pub use error::{IngestError, Result};
