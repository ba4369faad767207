//! Audit column annotation
//!
//! Adds the three fixed-name provenance columns to every record:
//! processing timestamp, originating raw-zone object, and run identifier.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::record::{RawRecord, PROCESSED_AT_COLUMN, RUN_ID_COLUMN, SOURCE_FILE_COLUMN};

/// Annotate a batch with audit columns.
///
/// `processed_at` is sampled once per run so every record in one write
/// carries the same timestamp. `_source_file` comes from the provenance
/// tag the reader attached, or an empty string when unknown. Existing
/// fields are never mutated; the audit names are reserved.
pub fn annotate(
    mut records: Vec<RawRecord>,
    run_id: &str,
    processed_at: DateTime<Utc>,
) -> Vec<RawRecord> {
    let processed_at = processed_at.to_rfc3339();

    for record in &mut records {
        let source_file = record.source_file().unwrap_or("").to_string();
        record.insert(PROCESSED_AT_COLUMN, Value::String(processed_at.clone()));
        record.insert(SOURCE_FILE_COLUMN, Value::String(source_file));
        record.insert(RUN_ID_COLUMN, Value::String(run_id.to_string()));
    }

    records
}
