//! spoke-ui library - authoritative assessment store
//!
//! Owns the per-user collection of finalized scoring records and exposes it
//! over HTTP: create/read/update/delete/list plus CSV import/export.

use axum::Router;
use sqlx::SqlitePool;

pub mod api;
pub mod db;
pub mod pagination;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
///
/// Assessment routes require a session token; /health and /api/login do not.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    // Protected routes (require authentication)
    let protected = Router::new()
        .route(
            "/api/assessments",
            get(api::list_assessments).post(api::create_assessment),
        )
        .route("/api/assessments/export", get(api::export_all))
        .route("/api/assessments/import", post(api::import_assessment))
        .route(
            "/api/assessments/:id",
            get(api::get_assessment)
                .put(api::update_assessment)
                .delete(api::delete_assessment),
        )
        .route("/api/assessments/:id/export", get(api::export_one))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    // Public routes (no authentication)
    let public = Router::new()
        .route("/api/login", post(api::login))
        .merge(api::health_routes());

    Router::new().merge(protected).merge(public).with_state(state)
}
