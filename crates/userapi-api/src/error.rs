use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use userapi_db::DatabaseError;

/// Failures surfaced to HTTP clients.
///
/// Store errors are translated here; the client only ever sees the short
/// `detail` string, never driver output.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Server error: {0}")]
    Server(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Connection(_) | ApiError::Database(_) | ApiError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Text safe to show to clients
    pub fn detail(&self) -> String {
        match self {
            ApiError::Validation(msg) => msg.clone(),
            ApiError::NotFound(what) => format!("{what} not found"),
            ApiError::Conflict(msg) => msg.clone(),
            ApiError::Connection(_) => "Database connection failed".to_string(),
            ApiError::Database(_) => "Database error".to_string(),
            ApiError::Server(_) => "Internal server error".to_string(),
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound => ApiError::NotFound("User".to_string()),
            DatabaseError::Conflict(_) => ApiError::Conflict("Email already exists".to_string()),
            DatabaseError::Connection(msg) => ApiError::Connection(msg),
            DatabaseError::Query(msg) | DatabaseError::Migration(msg) => ApiError::Database(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        let body = Json(ErrorResponse {
            detail: self.detail(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_errors_map_to_status_codes() {
        let cases = [
            (DatabaseError::NotFound, StatusCode::NOT_FOUND),
            (
                DatabaseError::Conflict("users_email_key".into()),
                StatusCode::CONFLICT,
            ),
            (
                DatabaseError::Connection("refused".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                DatabaseError::Query("syntax".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status_code(), expected);
        }
    }

    #[test]
    fn test_detail_hides_driver_text() {
        let err = ApiError::from(DatabaseError::Query(
            "relation \"users\" does not exist".into(),
        ));
        assert_eq!(err.detail(), "Database error");

        let err = ApiError::from(DatabaseError::Connection("password authentication failed".into()));
        assert_eq!(err.detail(), "Database connection failed");
    }
}
