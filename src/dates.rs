//! Date formatting and cleanup for upstream date values.
//!
//! Upstreams deliver dates in wildly different shapes: RFC 3339 strings,
//! assorted calendar formats, integer epoch timestamps, or display strings
//! embedded in markup with decorative noise around them. This module converts
//! all of them into one display format and provides the flexible re-parse used
//! by the ordering step.
//!
//! # Canonical Format
//!
//! `DD-MM-YYYY HH:MM`, 24-hour clock, zero-padded. Unparseable input becomes
//! an empty string; nothing in this module returns an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// strftime pattern for the canonical display format.
pub const DISPLAY_FORMAT: &str = "%d-%m-%Y %H:%M";

/// Calendar formats attempted, in order, when a date string is not RFC 3339.
const CALENDAR_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d-%m-%Y %H:%M",
    "%b %d, %Y %I:%M %p",
    "%B %d, %Y %H:%M",
];

static NBSP_ENTITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"&nbsp;?|\u{a0}").unwrap());
static HRS_IST_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)[|/]?\s*hrs\.?\s*ist\s*$").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Parse a raw date value with every format we know about.
///
/// Accepts RFC 3339 first, then the fixed calendar format list, then a bare
/// `YYYY-MM-DD` date pinned to midnight. Used both for display formatting of
/// structured-source dates and for the best-effort ordering re-sort.
///
/// # Returns
///
/// The parsed naive date-time, or `None` when nothing matched.
pub fn parse_flexible(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for format in &CALENDAR_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if raw.chars().all(|c| c.is_ascii_digit() || c == '-') {
        if let Ok(epoch) = raw.parse::<i64>() {
            return epoch_to_naive(epoch);
        }
    }
    None
}

/// Format a structured-source date value into the canonical display format.
///
/// Accepts a JSON string (parsed with [`parse_flexible`]) or an integer epoch
/// timestamp in seconds or milliseconds. Anything unparseable, including
/// nulls and unexpected types, degrades to an empty string.
pub fn format_structured(raw: &Value) -> String {
    let parsed = match raw {
        Value::String(s) => parse_flexible(s),
        Value::Number(n) => n.as_i64().and_then(epoch_to_naive),
        _ => None,
    };
    parsed
        .map(|dt| dt.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_default()
}

/// Interpret an integer as an epoch timestamp.
///
/// Values at or above 10^11 are taken as milliseconds; anything smaller as
/// seconds. The upstream clock is trusted as UTC.
fn epoch_to_naive(epoch: i64) -> Option<NaiveDateTime> {
    let dt = if epoch.abs() >= 100_000_000_000 {
        DateTime::from_timestamp_millis(epoch)?
    } else {
        DateTime::from_timestamp(epoch, 0)?
    };
    Some(dt.naive_utc())
}

/// Clean a markup-embedded date string.
///
/// Decodes non-breaking-space entities, strips a trailing `Hrs IST` unit
/// suffix, collapses whitespace runs, and trims. The upstream's own calendar
/// formatting is trusted after cleanup; no reparsing happens here.
pub fn clean_markup_date(raw: &str) -> String {
    let cleaned = NBSP_ENTITY.replace_all(raw, " ");
    let cleaned = HRS_IST_SUFFIX.replace(cleaned.trim(), "");
    WHITESPACE_RUN.replace_all(cleaned.trim(), " ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_rfc3339() {
        assert_eq!(
            format_structured(&json!("2024-01-02T15:04:00Z")),
            "02-01-2024 15:04"
        );
    }

    #[test]
    fn test_format_calendar_variants() {
        assert_eq!(
            format_structured(&json!("2024-01-02 15:04:00")),
            "02-01-2024 15:04"
        );
        assert_eq!(
            format_structured(&json!("Jan 02, 2024 03:04 PM")),
            "02-01-2024 15:04"
        );
    }

    #[test]
    fn test_format_epoch_seconds_and_millis() {
        // 2024-01-02T15:04:00Z
        assert_eq!(format_structured(&json!(1704207840)), "02-01-2024 15:04");
        assert_eq!(format_structured(&json!(1704207840000i64)), "02-01-2024 15:04");
    }

    #[test]
    fn test_format_garbage_is_empty() {
        assert_eq!(format_structured(&json!("not a date")), "");
        assert_eq!(format_structured(&Value::Null), "");
        assert_eq!(format_structured(&json!({"nested": true})), "");
        assert_eq!(format_structured(&json!("")), "");
    }

    #[test]
    fn test_round_trip_preserves_calendar_fields() {
        let formatted = format_structured(&json!("2024-03-07T09:05:00Z"));
        let reparsed = NaiveDateTime::parse_from_str(&formatted, DISPLAY_FORMAT).unwrap();
        assert_eq!(reparsed.format("%Y-%m-%d %H:%M").to_string(), "2024-03-07 09:05");
    }

    #[test]
    fn test_parse_flexible_date_only() {
        let dt = parse_flexible("2024-01-15").unwrap();
        assert_eq!(dt.format("%d-%m-%Y %H:%M").to_string(), "15-01-2024 00:00");
    }

    #[test]
    fn test_parse_flexible_epoch_string() {
        let dt = parse_flexible("1704207840").unwrap();
        assert_eq!(dt.format(DISPLAY_FORMAT).to_string(), "02-01-2024 15:04");
    }

    #[test]
    fn test_parse_flexible_rejects_garbage() {
        assert!(parse_flexible("garbage").is_none());
        assert!(parse_flexible("").is_none());
    }

    #[test]
    fn test_clean_markup_date_strips_noise() {
        assert_eq!(
            clean_markup_date("January 02, 2024&nbsp;&nbsp;03:04 PM Hrs IST"),
            "January 02, 2024 03:04 PM"
        );
        assert_eq!(
            clean_markup_date("  02 Jan 2024\u{a0}15:04 | hrs ist "),
            "02 Jan 2024 15:04"
        );
    }

    #[test]
    fn test_clean_markup_date_passes_plain_strings() {
        assert_eq!(clean_markup_date("February 9, 2024"), "February 9, 2024");
        assert_eq!(clean_markup_date(""), "");
    }
}
