//! Field normalization
//!
//! Trims every string-valued field, then drops records missing the
//! required identity key. The drop only applies when the key is declared
//! somewhere in the batch; an entirely key-less schema drops nothing.

use tracing::debug;

use crate::record::RawRecord;

/// Normalize a batch: trim strings everywhere, then filter on
/// `required_key`. Trimming always happens before the drop filter.
pub fn normalize(mut records: Vec<RawRecord>, required_key: &str) -> Vec<RawRecord> {
    for record in &mut records {
        record.trim_strings();
    }

    let declared = records.iter().any(|r| r.has_field(required_key));
    if !declared {
        debug!(required_key, "Identity key absent from batch, keeping all records");
        return records;
    }

    let before = records.len();
    records.retain(|r| r.has_value(required_key));
    debug!(
        required_key,
        dropped = before - records.len(),
        "Dropped records missing identity key"
    );

    records
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(values: Vec<serde_json::Value>) -> Vec<RawRecord> {
        values
            .into_iter()
            .map(|v| RawRecord::from_value(v).unwrap())
            .collect()
    }

    #[test]
    fn test_trims_every_string_field() {
        let input = records(vec![
            json!({"id": 1, "name": "  abc  ", "city": "\tParis\n", "count": 3}),
        ]);

        let out = normalize(input, "id");

        assert_eq!(out[0].get("name"), Some(&json!("abc")));
        assert_eq!(out[0].get("city"), Some(&json!("Paris")));
        assert_eq!(out[0].get("count"), Some(&json!(3)));
    }

    #[test]
    fn test_drops_records_missing_required_key() {
        let input = records(vec![
            json!({"id": 1, "name": "keep"}),
            json!({"name": "no id"}),
            json!({"id": null, "name": "null id"}),
        ]);

        let out = normalize(input, "id");

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].get("name"), Some(&json!("keep")));
    }

    #[test]
    fn test_undeclared_key_drops_nothing() {
        let input = records(vec![
            json!({"name": "a"}),
            json!({"name": "b"}),
        ]);

        let out = normalize(input, "id");
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_trim_happens_before_drop() {
        // The key itself is a padded string; trimming must not turn a
        // present key into a dropped record.
        let input = records(vec![json!({"id": "  k1  "})]);

        let out = normalize(input, "id");

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].get("id"), Some(&json!("k1")));
    }
}
