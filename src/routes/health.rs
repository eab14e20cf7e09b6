/// Liveness endpoint
use axum::Json;
use serde::Serialize;

use super::response::ResponseData;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /api/v1/health
pub async fn health() -> Json<ResponseData<HealthResponse>> {
    Json(ResponseData::new(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}
