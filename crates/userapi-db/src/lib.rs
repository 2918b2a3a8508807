pub mod config;
pub mod gateway;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

pub use config::{DatabaseConfig, RedactedConfig};
pub use gateway::{Gateway, PgGateway, STATS_WINDOW};
pub use memory::InMemoryGateway;
pub use pool::DatabasePool;

use thiserror::Error;

/// Every store failure is folded into one of these variants before it leaves
/// this crate, so callers never see driver error types.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    #[error("Row not found")]
    NotFound,

    #[error("Query error: {0}")]
    Query(String),

    #[error("Migration error: {0}")]
    Migration(String),
}

impl DatabaseError {
    /// Short label used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            DatabaseError::Connection(_) => "connection",
            DatabaseError::Conflict(_) => "conflict",
            DatabaseError::NotFound => "not_found",
            DatabaseError::Query(_) => "query",
            DatabaseError::Migration(_) => "migration",
        }
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound,
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                DatabaseError::Conflict(db_err.message().to_string())
            }
            sqlx::Error::Database(ref db_err)
                if db_err.code().is_some_and(|code| is_connection_sqlstate(&code)) =>
            {
                DatabaseError::Connection(db_err.message().to_string())
            }
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => DatabaseError::Connection(err.to_string()),
            other => DatabaseError::Query(other.to_string()),
        }
    }
}

/// SQLSTATE classes raised while establishing a session: `08` connection
/// exception, `28` invalid authorization, `3D` invalid catalog name
fn is_connection_sqlstate(code: &str) -> bool {
    ["08", "28", "3D"].iter().any(|class| code.starts_with(*class))
}

impl From<sqlx::migrate::MigrateError> for DatabaseError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DatabaseError::Migration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DatabaseError>;
