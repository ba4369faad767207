//! Lakezone Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the Lakezone workspace.
//!
//! # Overview
//!
//! This crate provides functionality used by both pipeline crates:
//!
//! - **Error Handling**: Shared error type and result alias
//! - **Logging**: Centralized tracing initialization
//! - **Storage**: Object store client and the `ObjectStore` seam
//!
//! # Example
//!
//! ```no_run
//! use lakezone_common::storage::{ObjectStore, Storage, StorageConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = StorageConfig::from_env()?;
//!     let storage = Storage::new(config).await?;
//!     let keys = storage.list("events/").await?;
//!     println!("{} objects", keys.len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;
pub mod storage;

// Re-export commonly used types
pub use error::{LakezoneError, Result};
