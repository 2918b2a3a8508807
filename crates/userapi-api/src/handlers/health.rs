use crate::state::ApiContext;
use crate::types::HealthResponse;
use axum::{extract::State, Json};
use chrono::Utc;

/// Liveness plus a store connectivity snapshot; never fails
pub async fn health_check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    let database = if ctx.gateway.ping().await {
        "connected"
    } else {
        "disconnected"
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "User API is running".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        database: database.to_string(),
    })
}
