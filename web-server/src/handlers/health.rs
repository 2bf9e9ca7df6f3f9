//! Health check handler

use axum::Json;
use serde::Serialize;
use waste_sorter_core::constants;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    app: &'static str,
    version: &'static str,
    timestamp: i64,
}

pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        app: constants::APP_NAME,
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
