//! Assessment CRUD handlers
//!
//! All handlers run behind the auth middleware and operate only on records
//! owned by the authenticated user. Ratings are rejected (never clamped) at
//! this boundary; clamping belongs to the editing surface.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use spoke_common::api::types::{
    AssessmentListResponse, CreateAssessmentRequest, UpdateAssessmentRequest,
};
use spoke_common::db::models::Assessment;
use spoke_common::record::{compute_averages_int, ratings_for_storage, Averages};
use spoke_common::{time, Error};
use uuid::Uuid;

use super::{ApiError, CurrentUser};
use crate::db::assessments as store;
use crate::db::ListFilter;
use crate::pagination::calculate_pagination;
use crate::AppState;

/// Query parameters for assessment listing
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Substring match on subject name
    pub subject: Option<String>,
    /// Inclusive date bounds (`YYYY-MM-DD`)
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: i64,
    pub page_size: Option<i64>,
}

fn default_page() -> i64 {
    1
}

impl ListQuery {
    pub(crate) fn filter(&self) -> ListFilter {
        ListFilter {
            subject_contains: self.subject.clone(),
            date_from: self.date_from.clone(),
            date_to: self.date_to.clone(),
        }
    }
}

/// Single-record response: the record plus its derived averages
///
/// Averages are recomputed on every read, never stored.
#[derive(Debug, Serialize)]
pub struct AssessmentDetail {
    #[serde(flatten)]
    pub assessment: Assessment,
    pub averages: Averages,
}

fn validate_date(date: &str) -> Result<(), ApiError> {
    if time::is_valid_date(date) {
        Ok(())
    } else {
        Err(ApiError(Error::Validation(format!(
            "Invalid assessment date (expected YYYY-MM-DD): {}",
            date
        ))))
    }
}

fn effective_subject(subject: &str) -> String {
    let trimmed = subject.trim();
    if trimmed.is_empty() {
        "Unknown".to_string()
    } else {
        trimmed.to_string()
    }
}

/// GET /api/assessments
pub async fn list_assessments(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<AssessmentListResponse>, ApiError> {
    let filter = query.filter();
    let total_results = store::count(&state.db, &user.0, &filter).await?;
    let p = calculate_pagination(total_results, query.page, query.page_size);

    let assessments =
        store::list(&state.db, &user.0, &filter, Some((p.page_size, p.offset))).await?;

    Ok(Json(AssessmentListResponse {
        total_results,
        page: p.page,
        page_size: p.page_size,
        total_pages: p.total_pages,
        assessments,
    }))
}

/// POST /api/assessments
pub async fn create_assessment(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<CreateAssessmentRequest>,
) -> Result<(StatusCode, Json<Assessment>), ApiError> {
    let ratings = ratings_for_storage(&request.ratings)?;

    let assessment_date = match request.assessment_date {
        Some(date) => {
            validate_date(&date)?;
            date
        }
        None => time::today(),
    };

    let now = time::now_rfc3339();
    let assessment = Assessment {
        guid: Uuid::new_v4().to_string(),
        user_guid: user.0.clone(),
        subject_name: effective_subject(&request.subject_name),
        assessment_date,
        ratings,
        created_at: now.clone(),
        updated_at: now,
    };

    store::insert(&state.db, &assessment).await?;
    Ok((StatusCode::CREATED, Json(assessment)))
}

/// GET /api/assessments/:id
pub async fn get_assessment(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<AssessmentDetail>, ApiError> {
    let assessment = store::get(&state.db, &user.0, &id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Assessment {}", id)))?;

    let averages = compute_averages_int(&assessment.ratings);
    Ok(Json(AssessmentDetail { assessment, averages }))
}

/// PUT /api/assessments/:id - partial update, only supplied fields change
pub async fn update_assessment(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(request): Json<UpdateAssessmentRequest>,
) -> Result<Json<Assessment>, ApiError> {
    let ratings = match &request.ratings {
        Some(raw) => Some(ratings_for_storage(raw)?),
        None => None,
    };
    if let Some(date) = &request.assessment_date {
        validate_date(date)?;
    }
    let subject_name = request.subject_name.as_deref().map(effective_subject);

    let updated = store::update(
        &state.db,
        &user.0,
        &id,
        subject_name,
        request.assessment_date,
        ratings,
    )
        .await?
        .ok_or_else(|| Error::NotFound(format!("Assessment {}", id)))?;

    Ok(Json(updated))
}

/// DELETE /api/assessments/:id - permanent
pub async fn delete_assessment(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if store::delete(&state.db, &user.0, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError(Error::NotFound(format!("Assessment {}", id))))
    }
}
