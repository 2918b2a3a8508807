use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for app_logs table (append-only audit log)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbRequestLog {
    pub id: i32,
    /// Concrete request path, e.g. `/users/7`
    pub endpoint: String,
    pub method: String,
    pub status_code: i32,
    /// UTC wall-clock time
    pub timestamp: NaiveDateTime,
}

/// One group of recent audit rows
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct RequestAggregate {
    pub endpoint: String,
    pub method: String,
    pub status_code: i32,
    pub count: i64,
}

/// Snapshot returned by the stats endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    pub user_count: i64,
    /// Ordered by descending count
    pub recent_requests: Vec<RequestAggregate>,
}
