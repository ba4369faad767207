//! Fetch-and-land orchestrator
//!
//! Drives fetch + land across all configured sources with bounded
//! concurrency. One bad source degrades the report, not the run: every
//! per-source error becomes a `failures` entry. Only a registry that
//! cannot be loaded aborts the run before any source is attempted.

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{error, info};

use crate::config::{SourceConfig, SourceProvider};
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::landing::LandingWriter;

/// Default number of sources processed concurrently.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Three-way run outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestStatus {
    /// Every attempted source landed
    Success,
    /// At least one source failed, the rest landed
    Partial,
    /// The run aborted before any source was attempted
    Failed,
}

impl IngestStatus {
    /// Multi-status style code: 200 full, 207 partial, 500 fatal.
    pub fn code(&self) -> u16 {
        match self {
            IngestStatus::Success => 200,
            IngestStatus::Partial => 207,
            IngestStatus::Failed => 500,
        }
    }
}

/// One source that fetched and landed
#[derive(Debug, Clone, Serialize)]
pub struct SourceSuccess {
    pub source: String,
    pub record_count: usize,
    pub object_key: String,
}

/// One source that failed to fetch or land
#[derive(Debug, Clone, Serialize)]
pub struct SourceFailure {
    pub source: String,
    pub message: String,
}

/// Aggregated outcome of one ingestion run
///
/// Invariant: `successes.len() + failures.len() == total_sources`, the
/// number of sources attempted after any name filter.
#[derive(Debug, Clone, Serialize)]
pub struct IngestionReport {
    pub timestamp: DateTime<Utc>,
    pub total_sources: usize,
    pub successes: Vec<SourceSuccess>,
    pub failures: Vec<SourceFailure>,
}

impl IngestionReport {
    pub fn status(&self) -> IngestStatus {
        if self.failures.is_empty() {
            IngestStatus::Success
        } else {
            IngestStatus::Partial
        }
    }
}

/// Runs fetch + land for every configured source
pub struct IngestOrchestrator {
    fetcher: Fetcher,
    landing: LandingWriter,
    concurrency: usize,
}

impl IngestOrchestrator {
    pub fn new(fetcher: Fetcher, landing: LandingWriter, concurrency: usize) -> Self {
        Self {
            fetcher,
            landing,
            concurrency: concurrency.max(1),
        }
    }

    /// Load the registry and process every selected source.
    ///
    /// Registry failures return `Err` without attempting any source; all
    /// other failures are recorded in the report.
    pub async fn run(
        &self,
        provider: &SourceProvider,
        filter: Option<&str>,
    ) -> Result<IngestionReport> {
        let registry = provider.load()?;
        let sources = registry.select(filter);
        let timestamp = Utc::now();

        Ok(self.run_sources(sources, timestamp).await)
    }

    /// Process an already-selected set of sources at a fixed ingestion
    /// timestamp.
    pub async fn run_sources(
        &self,
        sources: Vec<SourceConfig>,
        timestamp: DateTime<Utc>,
    ) -> IngestionReport {
        let total_sources = sources.len();
        info!(total_sources, "Starting ingestion run");

        let outcomes: Vec<_> = stream::iter(sources)
            .map(|source| self.process_source(source, timestamp))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut successes = Vec::new();
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(success) => successes.push(success),
                Err(failure) => failures.push(failure),
            }
        }

        // Completion order is nondeterministic under concurrency; re-sort
        // so the report is stable for callers.
        successes.sort_by(|a, b| a.source.cmp(&b.source));
        failures.sort_by(|a, b| a.source.cmp(&b.source));

        info!(
            successful = successes.len(),
            failed = failures.len(),
            "Ingestion run complete"
        );

        IngestionReport {
            timestamp,
            total_sources,
            successes,
            failures,
        }
    }

    async fn process_source(
        &self,
        source: SourceConfig,
        timestamp: DateTime<Utc>,
    ) -> std::result::Result<SourceSuccess, SourceFailure> {
        info!(source = %source.name, "Processing source");

        match self.try_source(&source, timestamp).await {
            Ok(success) => Ok(success),
            Err(e) => {
                error!(source = %source.name, error = %e, "Source failed");
                Err(SourceFailure {
                    source: source.name,
                    message: e.to_string(),
                })
            },
        }
    }

    async fn try_source(
        &self,
        source: &SourceConfig,
        timestamp: DateTime<Utc>,
    ) -> Result<SourceSuccess> {
        let payload = self.fetcher.fetch(source).await?;
        let landed = self.landing.land(&payload, &source.name, timestamp).await?;

        Ok(SourceSuccess {
            source: source.name.clone(),
            record_count: landed.record_count,
            object_key: landed.object_key,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::IngestError;
    use lakezone_common::storage::memory::MemoryObjectStore;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn orchestrator(store: Arc<MemoryObjectStore>) -> IngestOrchestrator {
        IngestOrchestrator::new(
            Fetcher::new().unwrap(),
            LandingWriter::new(store),
            DEFAULT_CONCURRENCY,
        )
    }

    fn inline_sources(server_uri: &str, names: &[&str]) -> SourceProvider {
        let sources: Vec<_> = names
            .iter()
            .map(|name| json!({"name": name, "url": format!("{}/{}", server_uri, name)}))
            .collect();
        SourceProvider::Inline(json!({ "sources": sources }).to_string())
    }

    #[tokio::test]
    async fn test_partial_failure_containment() {
        let server = MockServer::start().await;
        for name in ["alpha", "gamma"] {
            Mock::given(method("GET"))
                .and(path(format!("/{}", name)))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
                .mount(&server)
                .await;
        }
        Mock::given(method("GET"))
            .and(path("/beta"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryObjectStore::new());
        let provider = inline_sources(&server.uri(), &["alpha", "beta", "gamma"]);

        let report = orchestrator(store.clone())
            .run(&provider, None)
            .await
            .unwrap();

        assert_eq!(report.total_sources, 3);
        assert_eq!(report.successes.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].source, "beta");
        assert_eq!(report.status(), IngestStatus::Partial);
        assert_eq!(report.status().code(), 207);

        // The two healthy sources still landed, in name order.
        assert_eq!(report.successes[0].source, "alpha");
        assert_eq!(report.successes[1].source, "gamma");
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_full_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryObjectStore::new());
        let provider = inline_sources(&server.uri(), &["only"]);

        let report = orchestrator(store).run(&provider, None).await.unwrap();

        assert_eq!(report.status(), IngestStatus::Success);
        assert_eq!(report.successes[0].record_count, 1);
    }

    #[tokio::test]
    async fn test_fatal_config_short_circuit() {
        let store = Arc::new(MemoryObjectStore::new());
        let provider = SourceProvider::Inline("{broken".to_string());

        let err = orchestrator(store.clone())
            .run(&provider, None)
            .await
            .unwrap_err();

        assert!(matches!(err, IngestError::Config(_)));
        // No source attempted, nothing landed.
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_source_name_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryObjectStore::new());
        let provider = inline_sources(&server.uri(), &["alpha", "beta"]);

        let report = orchestrator(store.clone())
            .run(&provider, Some("beta"))
            .await
            .unwrap();

        assert_eq!(report.total_sources, 1);
        assert_eq!(report.successes[0].source, "beta");
        assert_eq!(store.len(), 1);
    }
}
