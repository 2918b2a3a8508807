use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for users table
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct DbUser {
    /// Generated primary key
    pub id: i32,
    pub name: String,
    /// Unique across all users
    pub email: String,
    /// Assigned by the server at insert; `TIMESTAMP` column holding UTC
    pub created_at: NaiveDateTime,
}
