//! Authentication for spoke-ui: login endpoint and bearer-token middleware
//!
//! Every assessment route is owner-scoped; the middleware resolves the bearer
//! token to a user guid and makes it available to handlers as a request
//! extension. Token issue/lookup logic lives in spoke-common.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use spoke_common::api::auth::{get_or_create_user, issue_session, lookup_session};
use spoke_common::api::types::{LoginRequest, LoginResponse};
use tracing::warn;

use super::ApiError;
use crate::AppState;

/// The authenticated user for the current request
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

/// POST /api/login
///
/// Issues a session token for the named user, creating the account on first
/// login. Not authenticated (it is how tokens are obtained).
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user_guid = get_or_create_user(&state.db, &request.name).await?;
    let token = issue_session(&state.db, &user_guid).await?;
    Ok(Json(LoginResponse { token, user_guid }))
}

/// Authentication middleware
///
/// Expects `Authorization: Bearer <token>`; returns 401 when the header is
/// absent or the token unknown.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AuthError::MissingToken)?
        .to_string();

    match lookup_session(&state.db, &token).await {
        Ok(Some(user_guid)) => {
            request.extensions_mut().insert(CurrentUser(user_guid));
            Ok(next.run(request).await)
        }
        Ok(None) => {
            warn!("Rejected request with unknown session token");
            Err(AuthError::UnknownToken)
        }
        Err(e) => Err(AuthError::Internal(e.to_string())),
    }
}

/// Authentication error types for HTTP responses
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    UnknownToken,
    Internal(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "Missing Authorization bearer token".to_string(),
            ),
            AuthError::UnknownToken => {
                (StatusCode::UNAUTHORIZED, "Unknown or expired session".to_string())
            }
            AuthError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Authentication error: {}", msg),
            ),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
