//! Key-based deduplication with a recency tie-break
//!
//! Keeps, per key, the record with the most recent recency value. When
//! the batch's schema carries neither the key nor the recency field the
//! stage is a pass-through, not an error.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::record::RawRecord;

/// Deduplicate `records` by `key_field`, keeping the record with the
/// maximum `recency_field` per key.
///
/// Selection is stable: on equal (or unparseable) recency the earliest
/// input occurrence wins, and output preserves first-occurrence input
/// order. Records individually missing the key pass through untouched.
pub fn dedupe(records: Vec<RawRecord>, key_field: &str, recency_field: &str) -> Vec<RawRecord> {
    let has_key = records.iter().any(|r| r.has_field(key_field));
    let has_recency = records.iter().any(|r| r.has_field(recency_field));
    if !has_key || !has_recency {
        debug!(key_field, recency_field, "Dedup fields absent from batch, passing through");
        return records;
    }

    let input_count = records.len();
    let mut slot_by_key: HashMap<String, usize> = HashMap::new();
    let mut kept: Vec<RawRecord> = Vec::with_capacity(records.len());

    for record in records {
        let key = match dedup_key(&record, key_field) {
            Some(key) => key,
            None => {
                kept.push(record);
                continue;
            },
        };

        match slot_by_key.get(&key) {
            Some(&slot) => {
                if recency(&record, recency_field) > recency(&kept[slot], recency_field) {
                    kept[slot] = record;
                }
            },
            None => {
                slot_by_key.insert(key, kept.len());
                kept.push(record);
            },
        }
    }

    debug!(
        input = input_count,
        output = kept.len(),
        "Deduplicated batch"
    );

    kept
}

fn dedup_key(record: &RawRecord, key_field: &str) -> Option<String> {
    match record.get(key_field)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn recency(record: &RawRecord, recency_field: &str) -> Option<DateTime<Utc>> {
    record.timestamp(recency_field)
}
