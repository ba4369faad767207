//! Processed zone writer
//!
//! Writes one batch as date-partitioned, snappy-compressed Parquet.
//! Records are grouped by partition key; each group becomes one file at
//! `{prefix}/year=Y/month=M/day=D/part-{uuid}.parquet`. Partition values
//! live in the path, not in the file columns.

use arrow::json::reader::infer_json_schema_from_iterator;
use arrow::json::ReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Result, TransformError};
use crate::partition::PartitionKey;
use crate::record::RawRecord;
use lakezone_common::storage::ObjectStore;

const PARQUET_CONTENT_TYPE: &str = "application/vnd.apache.parquet";

/// Outcome of one partitioned write
#[derive(Debug, Clone)]
pub struct WriteSummary {
    pub rows_written: u64,
    pub files: Vec<String>,
}

/// Writes partitioned batches into the processed zone
pub struct ProcessedZoneWriter {
    store: Arc<dyn ObjectStore>,
    prefix: String,
}

impl ProcessedZoneWriter {
    pub fn new(store: Arc<dyn ObjectStore>, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into().trim_matches('/').to_string();
        Self { store, prefix }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Write every partition group as one Parquet file.
    ///
    /// There is no partial-output contract: any failure fails the whole
    /// write.
    pub async fn write(&self, records: Vec<(PartitionKey, RawRecord)>) -> Result<WriteSummary> {
        let mut groups: BTreeMap<PartitionKey, Vec<Value>> = BTreeMap::new();
        for (key, record) in records {
            groups
                .entry(key)
                .or_default()
                .push(Value::Object(record.into_fields()));
        }

        let mut rows_written = 0u64;
        let mut files = Vec::with_capacity(groups.len());

        for (partition, rows) in groups {
            let row_count = rows.len();
            let bytes = encode_parquet(&rows)?;

            let key = format!(
                "{}/{}/part-{}.parquet",
                self.prefix,
                partition.path(),
                Uuid::new_v4()
            );

            debug!(key = %key, rows = row_count, bytes = bytes.len(), "Writing partition file");

            self.store
                .put(&key, bytes, PARQUET_CONTENT_TYPE, Default::default())
                .await
                .map_err(|e| TransformError::Write(format!("{}: {}", key, e)))?;

            rows_written += row_count as u64;
            files.push(key);
        }

        info!(
            prefix = %self.prefix,
            files = files.len(),
            rows = rows_written,
            "Partitioned write complete"
        );

        Ok(WriteSummary {
            rows_written,
            files,
        })
    }
}

/// Encode one partition group as a snappy-compressed Parquet file.
fn encode_parquet(rows: &[Value]) -> Result<Vec<u8>> {
    let schema = infer_json_schema_from_iterator(rows.iter().map(Ok))
        .map_err(|e| TransformError::Write(format!("schema inference failed: {}", e)))?;
    let schema = Arc::new(schema);

    let mut decoder = ReaderBuilder::new(schema.clone())
        .build_decoder()
        .map_err(|e| TransformError::Write(e.to_string()))?;
    decoder
        .serialize(rows)
        .map_err(|e| TransformError::Write(format!("row conversion failed: {}", e)))?;
    let batch = decoder
        .flush()
        .map_err(|e| TransformError::Write(e.to_string()))?
        .ok_or_else(|| TransformError::Write("empty partition group".to_string()))?;

    let properties = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    let mut buffer = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buffer, schema, Some(properties))
        .map_err(|e| TransformError::Write(e.to_string()))?;
    writer
        .write(&batch)
        .map_err(|e| TransformError::Write(e.to_string()))?;
    writer
        .close()
        .map_err(|e| TransformError::Write(e.to_string()))?;

    Ok(buffer)
}
