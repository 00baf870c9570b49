//! CSV codecs for scoring records
//!
//! Two textual forms:
//! - Single record: a `Categories,Ratings` header followed by one
//!   `metric_id,value` line per metric, in registry order.
//! - Multi record (export only): one row per record, one column per metric,
//!   plus the double-quoted subject name and the `YYYY-MM-DD` date.
//!
//! Import is forgiving about rows (unknown categories are skipped with a
//! warning, values are clamped) but strict about the header.

use crate::db::models::Assessment;
use crate::record::parse_rating;
use crate::schema;
use std::collections::BTreeMap;
use thiserror::Error;

/// Header line for single-record export
pub const SINGLE_RECORD_HEADER: &str = "Categories,Ratings";

/// CSV import failures
#[derive(Debug, Error)]
pub enum CsvError {
    /// Header line lacks the "categories" / "ratings" tokens
    #[error("Invalid CSV header: expected 'Categories' and 'Ratings' columns, got '{0}'")]
    BadHeader(String),

    /// No recognized metric rows after skipping unknown categories
    #[error("CSV contains no recognized metric rows")]
    EmptyOrInvalid,
}

/// Result of parsing a single-record CSV table
#[derive(Debug, Clone)]
pub struct ParsedTable {
    /// Recognized metric ratings, clamped into the valid domain
    pub ratings: BTreeMap<String, f64>,
    /// One warning per skipped (unrecognized) category row
    pub warnings: Vec<String>,
}

/// Serialize a stored ratings mapping to the two-column CSV form
///
/// Metrics appear in registry order; metrics absent from the mapping are
/// written as 0 so the table is always complete.
pub fn to_table(ratings: &BTreeMap<String, i64>) -> String {
    let mut out = String::from(SINGLE_RECORD_HEADER);
    out.push('\n');
    for id in schema::metric_ids() {
        let value = ratings.get(*id).copied().unwrap_or(0);
        out.push_str(id);
        out.push(',');
        out.push_str(&value.to_string());
        out.push('\n');
    }
    out
}

/// Parse a two-column CSV table into a partial ratings mapping
///
/// The header must contain both a "categories" and a "ratings" token
/// (case-insensitive, anywhere in the line). Rows whose first column is not a
/// known metric identifier are skipped and counted as warnings. Ratings of
/// recognized rows are clamped via [`parse_rating`]. Fails only when the
/// header is malformed or zero rows were recognized.
pub fn from_table(text: &str) -> Result<ParsedTable, CsvError> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());

    let header = lines.next().ok_or(CsvError::EmptyOrInvalid)?;
    let lowered = header.to_lowercase();
    if !lowered.contains("categories") || !lowered.contains("ratings") {
        return Err(CsvError::BadHeader(header.trim().to_string()));
    }

    let mut ratings = BTreeMap::new();
    let mut warnings = Vec::new();
    for line in lines {
        let (category, value) = match line.split_once(',') {
            Some((c, v)) => (c.trim(), v.trim()),
            None => (line.trim(), ""),
        };

        if schema::is_known_metric(category) {
            ratings.insert(category.to_string(), parse_rating(value));
        } else {
            warnings.push(format!("Skipped unrecognized category: {}", category));
        }
    }

    if ratings.is_empty() {
        return Err(CsvError::EmptyOrInvalid);
    }

    Ok(ParsedTable { ratings, warnings })
}

/// Serialize a set of records to the wide CSV form
///
/// Header: `Employee Name,Assessment Date,<metric ids...>`. Subject names are
/// double-quoted (embedded quotes doubled); metric columns follow registry
/// order.
pub fn to_wide_table(records: &[Assessment]) -> String {
    let mut out = String::from("Employee Name,Assessment Date");
    for id in schema::metric_ids() {
        out.push(',');
        out.push_str(id);
    }
    out.push('\n');

    for record in records {
        out.push('"');
        out.push_str(&record.subject_name.replace('"', "\"\""));
        out.push_str("\",");
        out.push_str(&record.assessment_date);
        for id in schema::metric_ids() {
            out.push(',');
            out.push_str(&record.ratings.get(*id).copied().unwrap_or(0).to_string());
        }
        out.push('\n');
    }
    out
}
