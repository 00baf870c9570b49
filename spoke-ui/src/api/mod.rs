//! HTTP API handlers for spoke-ui

pub mod assessments;
pub mod auth;
pub mod health;
pub mod transfer;

pub use assessments::{
    create_assessment, delete_assessment, get_assessment, list_assessments, update_assessment,
};
pub use auth::{auth_middleware, login, CurrentUser};
pub use health::health_routes;
pub use transfer::{export_all, export_one, import_assessment};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use spoke_common::record::StorageValidationError;
use spoke_common::Error;

/// API error wrapper mapping the common taxonomy onto HTTP status codes
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError(Error::Database(e))
    }
}

impl From<StorageValidationError> for ApiError {
    fn from(e: StorageValidationError) -> Self {
        ApiError(Error::Validation(e.to_string()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Auth(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.0.to_string(),
        }));

        (status, body).into_response()
    }
}
