//! HTTP fetcher for configured sources
//!
//! One bounded GET per source per run. Retry policy, if any, belongs to
//! the orchestrator, not here.

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::SourceConfig;
use crate::error::{IngestError, Result};

/// Hard per-request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP client wrapper that turns every failure into a per-source error
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent("lakezone-ingest/0.1")
            .build()?;

        Ok(Fetcher { client })
    }

    /// Fetch one source's payload as parsed JSON.
    ///
    /// Transport errors, non-2xx statuses and malformed bodies all map to
    /// [`IngestError::Fetch`]; nothing propagates past the caller uncaught.
    pub async fn fetch(&self, source: &SourceConfig) -> Result<serde_json::Value> {
        debug!(source = %source.name, url = %source.url, "Fetching source");

        let mut request = self
            .client
            .get(&source.url)
            .header("Content-Type", "application/json")
            .query(&source.params);

        if let Some(api_key) = &source.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| fetch_error(&source.name, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(
                &source.name,
                format!("HTTP status {}", status),
            ));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| fetch_error(&source.name, format!("malformed JSON body: {}", e)))?;

        info!(source = %source.name, "Fetched payload");

        Ok(payload)
    }
}

fn fetch_error(source: &str, message: String) -> IngestError {
    IngestError::Fetch {
        source: source.to_string(),
        message,
    }
}

// ============================================================================
// Tests
// ============================================================================
