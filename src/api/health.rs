//! Liveness endpoint

use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::types::Json;

/// Liveness payload
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// GET /api/health
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        success: true,
        status: "OK",
        message: "CodeScape Backend is running!",
        timestamp: Utc::now(),
    })
}
