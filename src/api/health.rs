//! Health check público del servidor

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const API_VERSION: &str = "1.0.0";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "ERP Server is running",
        timestamp: Utc::now(),
        version: API_VERSION,
    })
}
