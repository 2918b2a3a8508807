use serde::{Deserialize, Serialize};

/// Body of `GET /` and `GET /health`
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    /// RFC 3339
    pub timestamp: String,
    /// `connected` or `disconnected`
    pub database: String,
}
