//! Raw zone reader
//!
//! Lists landed objects under one table prefix, unwraps the landing
//! envelope, and yields records tagged with the object they came from.
//! Malformed landed objects are logged and skipped; they never fail the
//! run.

use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{Result, TransformError};
use crate::record::RawRecord;
use lakezone_common::storage::ObjectStore;

/// Reads one raw-zone table into a batch of records
pub struct RawZoneReader {
    store: Arc<dyn ObjectStore>,
    prefix: String,
}

impl RawZoneReader {
    /// `prefix` is the table's key prefix in the raw bucket, the source
    /// name for objects landed by the ingestion pipeline.
    pub fn new(store: Arc<dyn ObjectStore>, prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        if !prefix.is_empty() && !prefix.ends_with('/') {
            prefix.push('/');
        }
        Self { store, prefix }
    }

    /// Read every landed object under the prefix.
    pub async fn read(&self) -> Result<Vec<RawRecord>> {
        let keys = self
            .store
            .list(&self.prefix)
            .await
            .map_err(|e| TransformError::Read(e.to_string()))?;

        info!(prefix = %self.prefix, objects = keys.len(), "Reading raw zone");

        let mut records = Vec::new();
        for key in keys {
            if !key.ends_with(".json") {
                continue;
            }

            let body = self
                .store
                .get(&key)
                .await
                .map_err(|e| TransformError::Read(format!("{}: {}", key, e)))?;

            match serde_json::from_slice::<Value>(&body) {
                Ok(document) => records.extend(unwrap_envelope(document, &key)),
                Err(e) => {
                    warn!(key = %key, error = %e, "Skipping malformed landed object");
                },
            }
        }

        info!(prefix = %self.prefix, records = records.len(), "Read raw records");

        Ok(records)
    }
}

/// Extract records from one landed document.
///
/// Landed objects wrap the payload as `{data, metadata}`; bare arrays
/// and objects are accepted too. Non-object rows are skipped.
fn unwrap_envelope(document: Value, key: &str) -> Vec<RawRecord> {
    let payload = match document {
        Value::Object(mut envelope) if envelope.contains_key("data") => {
            envelope.remove("data").unwrap_or(Value::Null)
        },
        other => other,
    };

    match payload {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match RawRecord::from_value(item) {
                Some(record) => Some(record.with_source_file(key)),
                None => {
                    warn!(key = %key, "Skipping non-object row");
                    None
                },
            })
            .collect(),
        Value::Object(fields) => {
            vec![RawRecord::new(fields).with_source_file(key)]
        },
        _ => {
            warn!(key = %key, "Skipping scalar payload");
            Vec::new()
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use lakezone_common::storage::memory::MemoryObjectStore;
    use serde_json::json;
    use std::collections::HashMap;

    async fn put(store: &MemoryObjectStore, key: &str, body: Value) {
        store
            .put(
                key,
                serde_json::to_vec(&body).unwrap(),
                "application/json",
                HashMap::new(),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_reads_enveloped_arrays_with_provenance() {
        let store = Arc::new(MemoryObjectStore::new());
        put(
            &store,
            "orders/year=2024/month=01/day=01/hour=00/orders_a.json",
            json!({
                "data": [{"id": 1}, {"id": 2}],
                "metadata": {"source": "orders", "record_count": 2}
            }),
        )
        .await;
        put(
            &store,
            "orders/year=2024/month=01/day=01/hour=01/orders_b.json",
            json!({"data": {"id": 3}, "metadata": {"source": "orders", "record_count": 1}}),
        )
        .await;

        let reader = RawZoneReader::new(store, "orders");
        let records = reader.read().await.unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(
            records[0].source_file(),
            Some("orders/year=2024/month=01/day=01/hour=00/orders_a.json")
        );
        assert_eq!(records[2].get("id"), Some(&json!(3)));
    }

    #[tokio::test]
    async fn test_skips_malformed_objects() {
        let store = Arc::new(MemoryObjectStore::new());
        store
            .put(
                "orders/bad.json",
                b"{truncated".to_vec(),
                "application/json",
                HashMap::new(),
            )
            .await
            .unwrap();
        put(&store, "orders/good.json", json!({"data": [{"id": 1}]})).await;

        let reader = RawZoneReader::new(store, "orders");
        let records = reader.read().await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_ignores_other_prefixes_and_non_json() {
        let store = Arc::new(MemoryObjectStore::new());
        put(&store, "orders/a.json", json!({"data": [{"id": 1}]})).await;
        put(&store, "users/b.json", json!({"data": [{"id": 9}]})).await;
        store
            .put("orders/notes.txt", vec![], "text/plain", HashMap::new())
            .await
            .unwrap();

        let reader = RawZoneReader::new(store, "orders");
        let records = reader.read().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("id"), Some(&json!(1)));
    }
}
