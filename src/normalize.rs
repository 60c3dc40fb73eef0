//! Projection of untyped upstream records into canonical [`NewsRecord`]s.
//!
//! Structured upstreams disagree about everything: the property holding the
//! record array, the field carrying the headline, the field carrying the date.
//! This module is the only component that ever touches the untyped
//! `serde_json::Value` form; it tries fixed priority lists of field aliases
//! and degrades unmappable input to "not a headline" instead of failing the
//! batch.
//!
//! # Alias Priority
//!
//! | Concern | Aliases, first match wins |
//! |---------|---------------------------|
//! | Record list | `NewsList`, `newslist`, `News`, `Data`, `data`, `items`, `list` |
//! | Headline | `Title`, `Headline`, `NewsHeading`, `Heading`, `NewsTitle`, `NewsDesc` |
//! | Date | `DateTime`, `Date`, `TimeStamp`, `NewsDate`, `CreatedOn`, `NewsDateTime` |

use crate::dates;
use crate::models::NewsRecord;
use serde_json::Value;

/// Top-level property names that may hold the record array.
const LIST_FIELDS: [&str; 7] = ["NewsList", "newslist", "News", "Data", "data", "items", "list"];

/// Field names tried for the headline, in priority order.
const HEADLINE_FIELDS: [&str; 6] = [
    "Title",
    "Headline",
    "NewsHeading",
    "Heading",
    "NewsTitle",
    "NewsDesc",
];

/// Field names tried for the date, in priority order.
const DATE_FIELDS: [&str; 6] = [
    "DateTime",
    "Date",
    "TimeStamp",
    "NewsDate",
    "CreatedOn",
    "NewsDateTime",
];

/// Locate the record array inside a parsed upstream payload.
///
/// A payload that is itself an array is used directly. An object is probed
/// with the list aliases in order. Anything else, or an object with no
/// matching property, yields an empty slice.
pub fn locate_record_list(payload: &Value) -> &[Value] {
    match payload {
        Value::Array(records) => records,
        Value::Object(map) => {
            for field in &LIST_FIELDS {
                if let Some(Value::Array(records)) = map.get(*field) {
                    return records;
                }
            }
            &[]
        }
        _ => &[],
    }
}

/// Normalize one upstream record of unknown shape.
///
/// Headline and date are resolved through their alias lists. A record that is
/// not an object, or that yields no non-empty headline, is not a headline and
/// returns `None`; the caller filters those out. A missing or null date is
/// fine and leaves both date fields empty.
pub fn normalize_record(record: &Value) -> Option<NewsRecord> {
    let map = record.as_object()?;

    let headline = HEADLINE_FIELDS
        .iter()
        .filter_map(|field| map.get(*field))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|text| !text.is_empty())?;

    let raw_date = DATE_FIELDS
        .iter()
        .filter_map(|field| map.get(*field))
        .find(|value| !value.is_null());

    let date = raw_date.map(dates::format_structured).unwrap_or_default();
    let date_raw = raw_date.map(stringify_date);

    NewsRecord::new(headline, date, date_raw)
}

/// Normalize every record in a payload, dropping everything that is not a headline.
pub fn normalize_payload(payload: &Value) -> Vec<NewsRecord> {
    locate_record_list(payload)
        .iter()
        .filter_map(normalize_record)
        .collect()
}

/// Keep the upstream date value as an opaque string for the ordering step.
fn stringify_date(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_locates_list_under_aliases() {
        let payload = json!({"NewsList": [{"Title": "A"}]});
        assert_eq!(locate_record_list(&payload).len(), 1);

        let payload = json!({"data": [{"Title": "A"}, {"Title": "B"}]});
        assert_eq!(locate_record_list(&payload).len(), 2);
    }

    #[test]
    fn test_bare_array_is_the_list() {
        let payload = json!([{"Title": "A"}]);
        assert_eq!(locate_record_list(&payload).len(), 1);
    }

    #[test]
    fn test_unrecognized_envelope_yields_nothing() {
        assert!(locate_record_list(&json!({"unexpected": {}})).is_empty());
        assert!(locate_record_list(&json!("just a string")).is_empty());
        assert!(locate_record_list(&json!(42)).is_empty());
    }

    #[test]
    fn test_headline_alias_priority() {
        let record = json!({"NewsDesc": "lower priority", "Headline": "wins"});
        assert_eq!(normalize_record(&record).unwrap().headline, "wins");
    }

    #[test]
    fn test_empty_headline_falls_through_to_next_alias() {
        let record = json!({"Title": "   ", "NewsHeading": "fallback"});
        assert_eq!(normalize_record(&record).unwrap().headline, "fallback");
    }

    #[test]
    fn test_no_headline_is_not_a_record() {
        assert!(normalize_record(&json!({"Body": "text"})).is_none());
        assert!(normalize_record(&json!({"Title": ""})).is_none());
        assert!(normalize_record(&json!("not an object")).is_none());
        assert!(normalize_record(&json!({"Title": 42})).is_none());
    }

    #[test]
    fn test_date_alias_priority_and_formatting() {
        let record = json!({
            "Title": "RBI holds rates",
            "NewsDate": "ignored",
            "DateTime": "2024-01-02T15:04:00Z"
        });
        let normalized = normalize_record(&record).unwrap();
        assert_eq!(normalized.date, "02-01-2024 15:04");
        assert_eq!(normalized.date_raw.as_deref(), Some("2024-01-02T15:04:00Z"));
    }

    #[test]
    fn test_missing_date_is_not_an_error() {
        let normalized = normalize_record(&json!({"Title": "No date here"})).unwrap();
        assert_eq!(normalized.date, "");
        assert!(normalized.date_raw.is_none());
    }

    #[test]
    fn test_null_date_treated_as_absent() {
        let normalized = normalize_record(&json!({"Title": "Null date", "Date": null})).unwrap();
        assert!(normalized.date_raw.is_none());
    }

    #[test]
    fn test_unparseable_date_degrades_to_empty_display() {
        let normalized =
            normalize_record(&json!({"Title": "Odd date", "Date": "soonish"})).unwrap();
        assert_eq!(normalized.date, "");
        // the raw value is still carried for callers that want it
        assert_eq!(normalized.date_raw.as_deref(), Some("soonish"));
    }

    #[test]
    fn test_payload_yields_only_nonempty_headlines() {
        let payload = json!({"NewsList": [
            {"Title": "Kept"},
            {"Title": "   "},
            {"Body": "no headline field"},
            {"Title": "Also kept", "DateTime": "2024-01-02 09:00"},
            17,
        ]});
        let records = normalize_payload(&payload);
        let headlines: Vec<_> = records.iter().map(|r| r.headline.as_str()).collect();
        assert_eq!(headlines, vec!["Kept", "Also kept"]);
        assert!(records.iter().all(|r| !r.headline.trim().is_empty()));
    }

    #[test]
    fn test_numeric_epoch_date_is_stringified() {
        let normalized =
            normalize_record(&json!({"Title": "Epoch", "TimeStamp": 1704207840})).unwrap();
        assert_eq!(normalized.date, "02-01-2024 15:04");
        assert_eq!(normalized.date_raw.as_deref(), Some("1704207840"));
    }
}
