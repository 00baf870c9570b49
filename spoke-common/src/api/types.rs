//! Shared API request/response types
//!
//! Used by both the spoke-ui server handlers and the spoke-session HTTP
//! client so the two sides cannot disagree about the wire format.
//!
//! Ratings travel as f64: the editing surface tolerates fractional values,
//! and the server - not the wire format - is the place that rejects them.

use crate::db::models::Assessment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// POST /api/login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub name: String,
}

/// POST /api/login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_guid: String,
}

/// POST /api/assessments request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAssessmentRequest {
    pub subject_name: String,
    /// Defaults to today (server clock) when absent
    pub assessment_date: Option<String>,
    pub ratings: BTreeMap<String, f64>,
}

/// PUT /api/assessments/:id request - partial update, only supplied fields change
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateAssessmentRequest {
    pub subject_name: Option<String>,
    /// When supplied, must be a valid `YYYY-MM-DD` date
    pub assessment_date: Option<String>,
    /// When supplied, must be a complete, integral mapping
    pub ratings: Option<BTreeMap<String, f64>>,
}

/// GET /api/assessments response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentListResponse {
    pub total_results: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub assessments: Vec<Assessment>,
}

/// POST /api/assessments/import request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRequest {
    pub subject_name: String,
    pub assessment_date: Option<String>,
    /// Raw CSV text in the two-column form
    pub table: String,
}

/// POST /api/assessments/import response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    pub assessment: Assessment,
    /// One entry per skipped unrecognized category row
    pub warnings: Vec<String>,
}
