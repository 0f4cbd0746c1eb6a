// ==========================================
// Reagent Inventory - Expiration date handling
// ==========================================
// Stored form: YYYY-MM-DD
// Unrecognised text is kept verbatim by callers, never rejected
// ==========================================

use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const STORED_DATE_FORMAT: &str = "%Y-%m-%d";

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d", "%d/%m/%Y", "%d-%m-%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Recognises ISO dates (also with `/` or without separators),
/// day-first `D/M/YYYY`, ISO date-times and RFC 3339 timestamps.
pub fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive())
}

/// `YYYY-MM-DD` when recognised, the trimmed input otherwise.
pub fn normalize_date_text(raw: &str) -> String {
    let value = raw.trim();
    match parse_flexible_date(value) {
        Some(date) => date.format(STORED_DATE_FORMAT).to_string(),
        None => value.to_string(),
    }
}

/// Sort key for the expiration column (ms since epoch, UTC midnight).
/// Unset or unrecognised dates sort before every real date.
pub fn date_sort_key(stored: &str) -> Option<i64> {
    parse_flexible_date(stored)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_iso_variants() {
        assert_eq!(normalize_date_text("2025-03-07"), "2025-03-07");
        assert_eq!(normalize_date_text("2025/3/7"), "2025-03-07");
        assert_eq!(normalize_date_text("20250307"), "2025-03-07");
        assert_eq!(normalize_date_text("2025-03-07T10:20:00"), "2025-03-07");
        assert_eq!(normalize_date_text("2025-03-07T10:20:00Z"), "2025-03-07");
    }

    #[test]
    fn test_normalize_day_first() {
        assert_eq!(normalize_date_text("7/3/2025"), "2025-03-07");
        assert_eq!(normalize_date_text("31-12-2024"), "2024-12-31");
    }

    #[test]
    fn test_malformed_date_passes_through() {
        assert_eq!(normalize_date_text("pronto"), "pronto");
        assert_eq!(normalize_date_text(" 2025-13-40 "), "2025-13-40");
        assert_eq!(normalize_date_text(""), "");
    }

    #[test]
    fn test_sort_key_orders_unset_first() {
        let unset = date_sort_key("");
        let early = date_sort_key("2024-01-01");
        let late = date_sort_key("2025-01-01");
        assert!(unset < early);
        assert!(early < late);
    }
}
