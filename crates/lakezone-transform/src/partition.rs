//! Date partition assignment
//!
//! Every record receives a `(year, month, day)` partition key: from its
//! event timestamp when one is present and parseable, else from the
//! processing date. Assignment is pure and total; there is no reject
//! path.

use chrono::{Datelike, NaiveDate};

use crate::record::RawRecord;

/// Physical partition of the processed zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartitionKey {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl PartitionKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }

    /// Hive-style path segment, `year=2024/month=3/day=15`.
    pub fn path(&self) -> String {
        format!("year={}/month={}/day={}", self.year, self.month, self.day)
    }
}

/// Derive the partition key for one record.
pub fn assign_partition(
    record: &RawRecord,
    event_time_field: &str,
    processing_date: NaiveDate,
) -> PartitionKey {
    match record.timestamp(event_time_field) {
        Some(event_time) => PartitionKey::from_date(event_time.date_naive()),
        None => PartitionKey::from_date(processing_date),
    }
}
