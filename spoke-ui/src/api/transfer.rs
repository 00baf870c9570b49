//! CSV import/export endpoints
//!
//! Single-record export uses the two-column (metric, rating) form; the bulk
//! export uses the wide form with one row per record. Import accepts the
//! two-column form and behaves as a create on success.

use axum::{
    extract::{Path, Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    http::StatusCode,
    Extension, Json,
};
use spoke_common::api::types::{ImportRequest, ImportResponse};
use spoke_common::csv::{from_table, to_table, to_wide_table};
use spoke_common::db::models::Assessment;
use spoke_common::record::{export_filename, ratings_for_storage};
use spoke_common::{time, Error};
use uuid::Uuid;

use super::assessments::ListQuery;
use super::{ApiError, CurrentUser};
use crate::db::assessments as store;
use crate::AppState;

type CsvHeaders = [(axum::http::HeaderName, String); 2];

fn csv_response_headers(filename: &str) -> CsvHeaders {
    [
        (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ]
}

/// POST /api/assessments/import
///
/// Parses the raw table text, skipping unrecognized category rows with
/// warnings, then creates a record. Incomplete tables are rejected with the
/// list of missing metrics; a table with zero recognized rows or a malformed
/// header is rejected outright.
pub async fn import_assessment(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<ImportRequest>,
) -> Result<(StatusCode, Json<ImportResponse>), ApiError> {
    let parsed = from_table(&request.table)
        .map_err(|e| ApiError(Error::Validation(e.to_string())))?;
    let ratings = ratings_for_storage(&parsed.ratings)?;

    let assessment_date = match request.assessment_date {
        Some(date) => {
            if !time::is_valid_date(&date) {
                return Err(ApiError(Error::Validation(format!(
                    "Invalid assessment date (expected YYYY-MM-DD): {}",
                    date
                ))));
            }
            date
        }
        None => time::today(),
    };

    let subject = request.subject_name.trim();
    let now = time::now_rfc3339();
    let assessment = Assessment {
        guid: Uuid::new_v4().to_string(),
        user_guid: user.0.clone(),
        subject_name: if subject.is_empty() { "Unknown".to_string() } else { subject.to_string() },
        assessment_date,
        ratings,
        created_at: now.clone(),
        updated_at: now,
    };

    store::insert(&state.db, &assessment).await?;

    Ok((
        StatusCode::CREATED,
        Json(ImportResponse {
            assessment,
            warnings: parsed.warnings,
        }),
    ))
}

/// GET /api/assessments/:id/export
///
/// Two-column CSV with the standard download filename.
pub async fn export_one(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<(CsvHeaders, String), ApiError> {
    let assessment = store::get(&state.db, &user.0, &id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Assessment {}", id)))?;

    let filename = export_filename(&assessment.subject_name, &assessment.assessment_date);
    Ok((csv_response_headers(&filename), to_table(&assessment.ratings)))
}

/// GET /api/assessments/export
///
/// Wide CSV over all of the caller's records matching the list filters
/// (pagination parameters are ignored; export is always the full match).
pub async fn export_all(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> Result<(CsvHeaders, String), ApiError> {
    let records = store::list(&state.db, &user.0, &query.filter(), None).await?;

    let filename = format!("assessments_{}.csv", time::today());
    Ok((csv_response_headers(&filename), to_wide_table(&records)))
}
