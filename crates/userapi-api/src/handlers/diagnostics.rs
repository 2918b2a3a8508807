use crate::state::ApiContext;
use crate::types::DatabaseTestResponse;
use axum::{extract::State, Json};
use tracing::error;
use userapi_db::DatabaseError;

/// Probe the store and echo the (redacted) connection settings.
///
/// Always answers 200; failures are reported through `status`.
pub async fn test_database(State(ctx): State<ApiContext>) -> Json<DatabaseTestResponse> {
    let config = ctx.gateway.redacted_config();

    let response = match ctx.gateway.test_connection().await {
        Ok(diag) => DatabaseTestResponse {
            status: "success".to_string(),
            message: "Database connection successful".to_string(),
            postgresql_version: Some(diag.server_version),
            current_database: Some(diag.current_database),
            config,
        },
        Err(e) => {
            error!(error = %e, "Database test failed");
            let message = match e {
                DatabaseError::Connection(_) => "Cannot connect to database",
                _ => "Database error",
            };
            DatabaseTestResponse {
                status: "error".to_string(),
                message: message.to_string(),
                postgresql_version: None,
                current_database: None,
                config,
            }
        }
    };

    Json(response)
}
