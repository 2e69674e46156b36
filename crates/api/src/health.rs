//! Liveness and readiness endpoints (§6): `/health` never touches external
//! state, `/ready` checks database connectivity.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::error;

use crate::state::AppState;

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "preventia-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_healthy = match state.db.check_health().await {
        Ok(_) => true,
        Err(e) => {
            error!("database health check failed: {}", e);
            false
        }
    };

    let status = if db_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "ready": db_healthy,
            "checks": {
                "database": db_healthy,
            }
        })),
    )
}
