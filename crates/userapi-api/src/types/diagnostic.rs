use serde::{Deserialize, Serialize};
use userapi_db::RedactedConfig;

/// Body of `GET /db-test`
#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseTestResponse {
    /// `success` or `error`
    pub status: String,
    pub message: String,
    pub postgresql_version: Option<String>,
    pub current_database: Option<String>,
    pub config: RedactedConfig,
}
