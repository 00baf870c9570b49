//! spoke-ui - Assessment store server
//!
//! Persists per-user scoring records and serves the CRUD + import/export API
//! consumed by the editing client.

use anyhow::Result;
use spoke_common::config;
use spoke_common::db::init_database;
use spoke_ui::{build_router, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting Spoke Assessment Store (spoke-ui) v{}", env!("CARGO_PKG_VERSION"));

    let root_folder = config::resolve_root_folder(None);
    let db_path = config::database_path(&root_folder);
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path).await?;

    let state = AppState::new(pool);
    let app = build_router(state);

    let port = config::resolve_port();
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!("spoke-ui listening on http://127.0.0.1:{}", port);
    info!("Health check: http://127.0.0.1:{}/health", port);

    axum::serve(listener, app).await?;

    Ok(())
}
