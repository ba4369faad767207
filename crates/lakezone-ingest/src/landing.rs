//! Raw-zone landing writer
//!
//! Serializes one fetched payload, wrapped in a provenance envelope, to a
//! deterministic time-partitioned key in the raw zone.

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::error::{IngestError, Result};
use lakezone_common::storage::ObjectStore;

/// One object successfully written to the raw zone
#[derive(Debug, Clone)]
pub struct LandedObject {
    pub object_key: String,
    pub record_count: usize,
}

/// Writes fetched payloads into the raw zone
pub struct LandingWriter {
    store: Arc<dyn ObjectStore>,
}

impl LandingWriter {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Land one payload for `source` at the ingestion `timestamp`.
    ///
    /// Keys have one-second granularity: a rerun for the same source within
    /// the same second produces the same key and overwrites the earlier
    /// object.
    pub async fn land(
        &self,
        payload: &serde_json::Value,
        source: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<LandedObject> {
        let object_key = object_key(source, timestamp);
        let record_count = record_count(payload);

        let envelope = json!({
            "data": payload,
            "metadata": {
                "source": source,
                "ingestion_time": timestamp.to_rfc3339(),
                "record_count": record_count,
            }
        });

        let body = serde_json::to_vec(&envelope)
            .map_err(|e| land_error(source, format!("failed to serialize envelope: {}", e)))?;

        let metadata = HashMap::from([
            ("source".to_string(), source.to_string()),
            ("ingestion_time".to_string(), timestamp.to_rfc3339()),
        ]);

        self.store
            .put(&object_key, body, "application/json", metadata)
            .await
            .map_err(|e| land_error(source, e.to_string()))?;

        info!(source, key = %object_key, records = record_count, "Landed payload");

        Ok(LandedObject {
            object_key,
            record_count,
        })
    }
}

/// Hour-granularity partition path for one source and ingestion timestamp.
pub fn partition_path(source: &str, timestamp: DateTime<Utc>) -> String {
    format!(
        "{}/year={}/month={:02}/day={:02}/hour={:02}/",
        source,
        timestamp.year(),
        timestamp.month(),
        timestamp.day(),
        timestamp.hour()
    )
}

/// Full object key: partition path plus a compact-timestamp filename.
pub fn object_key(source: &str, timestamp: DateTime<Utc>) -> String {
    format!(
        "{}{}_{}.json",
        partition_path(source, timestamp),
        source,
        timestamp.format("%Y%m%d_%H%M%S")
    )
}

/// Payload length if it is an array, else 1.
pub fn record_count(payload: &serde_json::Value) -> usize {
    match payload.as_array() {
        Some(items) => items.len(),
        None => 1,
    }
}

fn land_error(source: &str, message: String) -> IngestError {
    IngestError::Land {
        source: source.to_string(),
        message,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use lakezone_common::storage::memory::MemoryObjectStore;
    use serde_json::json;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 9, 7, 42).unwrap()
    }

    #[test]
    fn test_partition_path_zero_pads() {
        assert_eq!(
            partition_path("orders", ts()),
            "orders/year=2024/month=03/day=05/hour=09/"
        );
    }

    #[test]
    fn test_object_key_is_deterministic() {
        let key = object_key("orders", ts());
        assert_eq!(
            key,
            "orders/year=2024/month=03/day=05/hour=09/orders_20240305_090742.json"
        );
        assert_eq!(key, object_key("orders", ts()));
    }

    #[test]
    fn test_record_count() {
        assert_eq!(record_count(&json!([1, 2, 3])), 3);
        assert_eq!(record_count(&json!({"id": 1})), 1);
        assert_eq!(record_count(&json!([])), 0);
    }

    #[tokio::test]
    async fn test_land_writes_envelope_and_metadata() {
        let store = Arc::new(MemoryObjectStore::new());
        let writer = LandingWriter::new(store.clone());

        let landed = writer
            .land(&json!([{"id": 1}, {"id": 2}]), "orders", ts())
            .await
            .unwrap();

        assert_eq!(landed.record_count, 2);

        let stored = store.object(&landed.object_key).unwrap();
        assert_eq!(stored.content_type, "application/json");
        assert_eq!(stored.metadata.get("source").unwrap(), "orders");

        let envelope: serde_json::Value = serde_json::from_slice(&stored.body).unwrap();
        assert_eq!(envelope["metadata"]["source"], json!("orders"));
        assert_eq!(envelope["metadata"]["record_count"], json!(2));
        assert_eq!(envelope["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_land_same_second_overwrites() {
        let store = Arc::new(MemoryObjectStore::new());
        let writer = LandingWriter::new(store.clone());

        writer.land(&json!([1]), "orders", ts()).await.unwrap();
        writer.land(&json!([1, 2]), "orders", ts()).await.unwrap();

        assert_eq!(store.len(), 1);
    }
}
