//! Timestamp utilities

use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current UTC timestamp in RFC 3339 form (stored in `created_at` columns)
pub fn now_rfc3339() -> String {
    now().to_rfc3339()
}

/// Current UTC date in `YYYY-MM-DD` form
pub fn today() -> String {
    now().format("%Y-%m-%d").to_string()
}

/// Whether `date` is a plausible `YYYY-MM-DD` date string
pub fn is_valid_date(date: &str) -> bool {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
}
