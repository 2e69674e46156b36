//! Compliance admin route (§6: `/compliance/validate`): forces an
//! out-of-band recompute of a Source's compliance score (§4.1 `score_source`).

use crate::{error::ApiError, response::success, state::AppState};
use axum::{extract::State, routing::post, Json, Router};
use preventia_domain::SourceService;
use serde::Deserialize;

pub fn compliance_routes() -> Router<AppState> {
    Router::new().route("/validate", post(validate_source))
}

#[derive(Deserialize)]
struct ValidateRequest {
    source_id: i64,
}

async fn validate_source(
    State(state): State<AppState>,
    Json(body): Json<ValidateRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (score, tier) = state.source_service.revalidate_compliance(body.source_id).await?;
    Ok(Json(success(serde_json::json!({
        "source_id": body.source_id,
        "compliance_score": score,
        "risk_tier": tier,
    }))))
}
