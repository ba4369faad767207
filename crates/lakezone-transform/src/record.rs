//! Record model for the transform pipeline
//!
//! Records are semi-structured JSON objects. The untyped `serde_json`
//! form stays confined to the zone boundaries; inside the pipeline every
//! row is a [`RawRecord`] carrying its fields plus the provenance tag the
//! raw-zone reader attached.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

/// Audit column: UTC timestamp the batch was processed at.
pub const PROCESSED_AT_COLUMN: &str = "_processed_at";

/// Audit column: raw-zone object the record came from.
pub const SOURCE_FILE_COLUMN: &str = "_source_file";

/// Audit column: run identifier.
pub const RUN_ID_COLUMN: &str = "_job_run_id";

/// Run identifier used when the invoking environment supplies none.
pub const DEFAULT_RUN_ID: &str = "local";

/// One semi-structured row moving through the pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    fields: Map<String, Value>,
    source_file: Option<String>,
}

impl RawRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            source_file: None,
        }
    }

    /// Build a record from a JSON value; non-objects have no field
    /// structure and yield `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self::new(fields)),
            _ => None,
        }
    }

    /// Tag the record with the raw-zone object it came from.
    pub fn with_source_file(mut self, key: impl Into<String>) -> Self {
        self.source_file = Some(key.into());
        self
    }

    pub fn source_file(&self) -> Option<&str> {
        self.source_file.as_deref()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Whether the field exists at all, null included.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Whether the field exists with a non-null value.
    pub fn has_value(&self, field: &str) -> bool {
        matches!(self.fields.get(field), Some(v) if !v.is_null())
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.fields.insert(field.into(), value);
    }

    /// Parse the given field as an event timestamp.
    pub fn timestamp(&self, field: &str) -> Option<DateTime<Utc>> {
        self.fields.get(field).and_then(parse_timestamp)
    }

    /// Trim leading/trailing whitespace from every string-valued field.
    /// Non-string fields are untouched.
    pub fn trim_strings(&mut self) {
        for value in self.fields.values_mut() {
            if let Value::String(s) = value {
                let trimmed = s.trim();
                if trimmed.len() != s.len() {
                    *value = Value::String(trimmed.to_string());
                }
            }
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

/// Parse a JSON value as a UTC timestamp.
///
/// Accepts RFC 3339 strings, naive `YYYY-MM-DDTHH:MM:SS` /
/// `YYYY-MM-DD HH:MM:SS` strings (read as UTC), bare dates, and integer
/// epoch seconds.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
                if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                    return Some(naive.and_utc());
                }
            }
            if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
            }
            None
        },
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        _ => None,
    }
}
