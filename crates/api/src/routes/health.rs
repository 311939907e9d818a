//! Liveness and schema state, mounted at the root rather than under `/api/v1`.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when the database answers and the schema is current, else `degraded`.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Embedded migrations missing from the database. `null` if unknown.
    pub pending_migrations: Option<usize>,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = kcv_db::health_check(&state.pool).await.is_ok();
    let pending_migrations = if db_healthy {
        match kcv_db::pending_migrations(&state.pool).await {
            Ok(pending) => Some(pending),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read migration state");
                None
            }
        }
    } else {
        None
    };

    let status = if db_healthy && pending_migrations == Some(0) {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        pending_migrations,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
