//! Health endpoint: liveness plus the loaded model's shape.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::AppContext;
use crate::config;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub categories: usize,
    pub feature_dim: usize,
    pub version: &'static str,
}

/// `GET /api/health`
pub async fn check(State(ctx): State<AppContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        categories: ctx.engine.categories().len(),
        feature_dim: ctx.engine.feature_dim(),
        version: config::APP_VERSION,
    })
}
