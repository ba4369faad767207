//! Transform pipeline
//!
//! Runs the fixed stage order over one raw-zone table: dedupe,
//! normalize, annotate, partition, write. The stages themselves are pure
//! functions over record batches; this module wires them between the
//! raw-zone reader and the processed-zone writer.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::annotate::annotate;
use crate::dedupe::dedupe;
use crate::error::Result;
use crate::normalize::normalize;
use crate::partition::{assign_partition, PartitionKey};
use crate::reader::RawZoneReader;
use crate::record::{RawRecord, DEFAULT_RUN_ID};
use crate::writer::ProcessedZoneWriter;

/// Stage configuration for one run
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Identity key for dedup and the required-field drop.
    pub key_field: String,
    /// Event-time field for dedup recency and date partitioning.
    pub event_time_field: String,
    /// Run identifier stamped into the audit columns.
    pub run_id: Option<String>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            key_field: "id".to_string(),
            event_time_field: "timestamp".to_string(),
            run_id: None,
        }
    }
}

/// Outcome of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct TransformReport {
    /// Records read from the raw zone.
    pub records_read: u64,
    /// Rows that actually landed in the processed zone. Dedup and the
    /// required-key drop make this smaller than `records_read`.
    pub rows_written: u64,
    /// Processed-zone prefix the partition files were written under.
    pub output_path: String,
    /// Parquet files written, in partition order.
    pub files: Vec<String>,
}

/// Apply the stage chain to an in-memory batch.
///
/// `processed_at` drives both the audit timestamp and the fallback
/// partition date, so one run is internally consistent.
pub fn transform_records(
    records: Vec<RawRecord>,
    options: &TransformOptions,
    processed_at: DateTime<Utc>,
) -> Vec<(PartitionKey, RawRecord)> {
    let run_id = options.run_id.as_deref().unwrap_or(DEFAULT_RUN_ID);
    let processing_date = processed_at.date_naive();

    let records = dedupe(records, &options.key_field, &options.event_time_field);
    let records = normalize(records, &options.key_field);
    let records = annotate(records, run_id, processed_at);

    records
        .into_iter()
        .map(|record| {
            let key = assign_partition(&record, &options.event_time_field, processing_date);
            (key, record)
        })
        .collect()
}

/// One raw table in, one processed table out
pub struct TransformPipeline {
    reader: RawZoneReader,
    writer: ProcessedZoneWriter,
    options: TransformOptions,
}

impl TransformPipeline {
    pub fn new(
        reader: RawZoneReader,
        writer: ProcessedZoneWriter,
        options: TransformOptions,
    ) -> Self {
        Self {
            reader,
            writer,
            options,
        }
    }

    pub async fn run(&self) -> Result<TransformReport> {
        let records = self.reader.read().await?;
        let records_read = records.len() as u64;

        let partitioned = transform_records(records, &self.options, Utc::now());
        let summary = self.writer.write(partitioned).await?;

        info!(
            records_read,
            rows_written = summary.rows_written,
            files = summary.files.len(),
            "Transform run complete"
        );

        Ok(TransformReport {
            records_read,
            rows_written: summary.rows_written,
            output_path: self.writer.prefix().to_string(),
            files: summary.files,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::record::{PROCESSED_AT_COLUMN, RUN_ID_COLUMN, SOURCE_FILE_COLUMN};
    use chrono::TimeZone;
    use serde_json::json;

    fn records(values: Vec<serde_json::Value>) -> Vec<RawRecord> {
        values
            .into_iter()
            .map(|v| RawRecord::from_value(v).unwrap())
            .collect()
    }

    #[test]
    fn test_stage_order_dedupe_then_drop_then_annotate() {
        let input = records(vec![
            json!({"id": "a", "timestamp": "2024-03-15T10:00:00Z", "v": 1}),
            json!({"id": "a", "timestamp": "2024-03-16T10:00:00Z", "v": 2}),
            json!({"name": "no id"}),
            json!({"id": "b", "timestamp": "2024-03-15T08:00:00Z", "v": 3}),
        ]);
        let processed_at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        let out = transform_records(input, &TransformOptions::default(), processed_at);

        // Older duplicate and the keyless record are gone.
        assert_eq!(out.len(), 2);
        let winner = out.iter().find(|(_, r)| r.get("id") == Some(&json!("a"))).unwrap();
        assert_eq!(winner.1.get("v"), Some(&json!(2)));
        assert_eq!(
            winner.0,
            PartitionKey {
                year: 2024,
                month: 3,
                day: 16
            }
        );

        for (_, record) in &out {
            assert!(record.get(PROCESSED_AT_COLUMN).is_some());
            assert_eq!(record.get(RUN_ID_COLUMN), Some(&json!("local")));
            assert_eq!(record.get(SOURCE_FILE_COLUMN), Some(&json!("")));
        }
    }

    #[test]
    fn test_explicit_run_id_is_stamped() {
        let input = records(vec![json!({"id": 1, "timestamp": "2024-01-01T00:00:00Z"})]);
        let options = TransformOptions {
            run_id: Some("jr_123".to_string()),
            ..TransformOptions::default()
        };

        let out = transform_records(input, &options, Utc::now());
        assert_eq!(out[0].1.get(RUN_ID_COLUMN), Some(&json!("jr_123")));
    }

    #[test]
    fn test_missing_event_time_partitions_by_processing_date() {
        let input = records(vec![json!({"id": 1})]);
        let processed_at = Utc.with_ymd_and_hms(2024, 9, 30, 23, 0, 0).unwrap();

        let out = transform_records(input, &TransformOptions::default(), processed_at);
        assert_eq!(
            out[0].0,
            PartitionKey {
                year: 2024,
                month: 9,
                day: 30
            }
        );
    }

    #[test]
    fn test_empty_input_is_empty_output() {
        let out = transform_records(Vec::new(), &TransformOptions::default(), Utc::now());
        assert!(out.is_empty());
    }
}
