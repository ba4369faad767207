//! End-to-end ingestion tests
//!
//! Exercise the full orchestrator path over a mock HTTP server and the
//! in-memory object store: registry load, per-source fetch + land,
//! partial-failure reporting.

use lakezone_common::storage::memory::MemoryObjectStore;
use lakezone_common::storage::ObjectStore;
use lakezone_ingest::config::SourceProvider;
use lakezone_ingest::fetcher::Fetcher;
use lakezone_ingest::landing::LandingWriter;
use lakezone_ingest::orchestrator::{IngestOrchestrator, IngestStatus};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn orchestrator(store: Arc<MemoryObjectStore>) -> IngestOrchestrator {
    IngestOrchestrator::new(Fetcher::new().unwrap(), LandingWriter::new(store), 2)
}

#[tokio::test]
async fn test_partial_run_reports_and_lands() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": 1, "timestamp": "2024-01-01T00:00:00Z"}])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let provider = SourceProvider::Inline(
        json!({
            "sources": [
                {"name": "a", "url": format!("{}/a", server.uri())},
                {"name": "b", "url": format!("{}/b", server.uri())}
            ]
        })
        .to_string(),
    );

    let store = Arc::new(MemoryObjectStore::new());
    let report = orchestrator(store.clone())
        .run(&provider, None)
        .await
        .unwrap();

    assert_eq!(report.total_sources, 2);
    assert_eq!(report.successes.len(), 1);
    assert_eq!(report.successes[0].source, "a");
    assert_eq!(report.successes[0].record_count, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].source, "b");
    assert_eq!(report.status(), IngestStatus::Partial);

    // Exactly one object landed, under source a's hive-style prefix.
    let keys = store.keys();
    assert_eq!(keys.len(), 1);
    assert!(keys[0].starts_with("a/year="));
    assert!(keys[0].ends_with(".json"));
    assert_eq!(keys[0], report.successes[0].object_key);

    // The envelope carries the payload and its provenance.
    let body = store.get(&keys[0]).await.unwrap();
    let envelope: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(envelope["data"][0]["id"], json!(1));
    assert_eq!(envelope["metadata"]["source"], json!("a"));
    assert_eq!(envelope["metadata"]["record_count"], json!(1));
}

#[tokio::test]
async fn test_report_is_sorted_by_source_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let provider = SourceProvider::Inline(
        json!({
            "sources": [
                {"name": "zulu", "url": server.uri()},
                {"name": "alpha", "url": server.uri()},
                {"name": "mike", "url": server.uri()}
            ]
        })
        .to_string(),
    );

    let store = Arc::new(MemoryObjectStore::new());
    let report = orchestrator(store).run(&provider, None).await.unwrap();

    let names: Vec<_> = report.successes.iter().map(|s| s.source.as_str()).collect();
    assert_eq!(names, vec!["alpha", "mike", "zulu"]);
}
