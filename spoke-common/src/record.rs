//! Scoring record engine: rating clamp, completeness validation, averages
//!
//! The editing surface clamps bad input into the valid domain; the persistence
//! boundary rejects it instead. Both rules live here so the two sides cannot
//! drift apart.

use crate::schema::{self, RATING_MAX, RATING_MIN};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// ========================================
// Clamping (editing surface)
// ========================================

/// Clamp a numeric rating into the valid domain [0, 5]
///
/// NaN becomes 0. Fractional values already in range pass through untouched;
/// this is a clamp, not a rounding step.
pub fn clamp_rating(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(RATING_MIN as f64, RATING_MAX as f64)
}

/// Parse raw text as a rating, clamping into the valid domain
///
/// Unparseable input coerces to 0 rather than failing; the editing surface
/// never rejects.
pub fn parse_rating(raw: &str) -> f64 {
    raw.trim().parse::<f64>().map(clamp_rating).unwrap_or(0.0)
}

// ========================================
// Validation (persistence boundary)
// ========================================

/// Why a ratings mapping was rejected at the persistence boundary
#[derive(Debug, Error)]
pub enum StorageValidationError {
    /// A key that is not in the schema registry
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    /// A rating outside [0, 5]
    #[error("Rating out of range for {metric}: {value}")]
    OutOfRange { metric: String, value: f64 },

    /// A non-integer rating (the server stores integers only)
    #[error("Rating for {metric} is not an integer: {value}")]
    NotInteger { metric: String, value: f64 },

    /// Metrics the mapping is missing, in registry order
    #[error("Missing metrics: {}", .0.join(", "))]
    Missing(Vec<String>),
}

/// Check that every registry metric is present with an integer value in [0, 5]
///
/// Returns the missing identifiers in registry order on failure. Out-of-range
/// or unknown entries are a different failure mode and are checked by
/// [`ratings_for_storage`]; this function answers only the completeness
/// question.
pub fn validate_complete(ratings: &BTreeMap<String, i64>) -> std::result::Result<(), Vec<String>> {
    let missing: Vec<String> = schema::metric_ids()
        .iter()
        .filter(|id| {
            !matches!(ratings.get(**id), Some(v) if (RATING_MIN..=RATING_MAX).contains(v))
        })
        .map(|id| id.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}

/// Validate a wire-format ratings mapping for storage
///
/// The wire carries f64 because the editing surface tolerates fractional
/// values; storage does not. Rejects unknown keys, out-of-range values,
/// non-integer values, and incomplete mappings. Never clamps.
pub fn ratings_for_storage(
    input: &BTreeMap<String, f64>,
) -> std::result::Result<BTreeMap<String, i64>, StorageValidationError> {
    for key in input.keys() {
        if !schema::is_known_metric(key) {
            return Err(StorageValidationError::UnknownMetric(key.clone()));
        }
    }

    let mut out = BTreeMap::new();
    let mut missing = Vec::new();
    for id in schema::metric_ids() {
        match input.get(*id) {
            None => missing.push(id.to_string()),
            Some(&v) => {
                if !(RATING_MIN as f64..=RATING_MAX as f64).contains(&v) {
                    return Err(StorageValidationError::OutOfRange {
                        metric: id.to_string(),
                        value: v,
                    });
                }
                if v.fract() != 0.0 {
                    return Err(StorageValidationError::NotInteger {
                        metric: id.to_string(),
                        value: v,
                    });
                }
                out.insert(id.to_string(), v as i64);
            }
        }
    }

    if !missing.is_empty() {
        return Err(StorageValidationError::Missing(missing));
    }

    Ok(out)
}

// ========================================
// Averages
// ========================================

/// Average rating for one theme
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeAverage {
    pub theme: String,
    pub average: f64,
}

/// Derived per-theme and overall averages
///
/// Never stored; always recomputed from the current mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Averages {
    pub per_theme: Vec<ThemeAverage>,
    pub overall: f64,
}

/// Compute per-theme and overall averages for a ratings mapping
///
/// Metrics absent from the mapping count as 0 (the editing surface tolerates
/// partial mappings). The overall average is the mean of all metric ratings,
/// not the mean of theme averages; theme sizes differ.
pub fn compute_averages(ratings: &BTreeMap<String, f64>) -> Averages {
    let mut per_theme = Vec::with_capacity(schema::themes().len());
    let mut total = 0.0;

    for theme in schema::themes() {
        let sum: f64 = theme
            .metrics
            .iter()
            .map(|m| ratings.get(m.id).copied().unwrap_or(0.0))
            .sum();
        total += sum;
        per_theme.push(ThemeAverage {
            theme: theme.name.to_string(),
            // Themes always have at least one metric
            average: sum / theme.metrics.len() as f64,
        });
    }

    Averages {
        per_theme,
        overall: total / schema::metric_count() as f64,
    }
}

/// Compute averages for a stored (integer) ratings mapping
pub fn compute_averages_int(ratings: &BTreeMap<String, i64>) -> Averages {
    let as_f64: BTreeMap<String, f64> = ratings
        .iter()
        .map(|(k, v)| (k.clone(), *v as f64))
        .collect();
    compute_averages(&as_f64)
}

// ========================================
// Export filename
// ========================================

/// Sanitize a subject name for use in a filename
///
/// Replaces any character outside `[A-Za-z0-9_-]` with `_`, collapses runs of
/// `_`, and truncates to 50 characters. An empty result falls back to "user".
pub fn sanitize_for_filename(subject: &str) -> String {
    let mut out = String::with_capacity(subject.len());
    let mut last_was_underscore = false;
    for c in subject.chars() {
        let mapped = if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            c
        } else {
            '_'
        };
        if mapped == '_' {
            if last_was_underscore {
                continue;
            }
            last_was_underscore = true;
        } else {
            last_was_underscore = false;
        }
        out.push(mapped);
        if out.len() >= 50 {
            break;
        }
    }

    if out.chars().all(|c| c == '_') {
        "user".to_string()
    } else {
        out
    }
}

/// Build the single-record export filename: `{subject}_assessment_{date}.csv`
pub fn export_filename(subject: &str, date: &str) -> String {
    format!("{}_assessment_{}.csv", sanitize_for_filename(subject), date)
}
