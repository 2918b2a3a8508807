use crate::models::DbDiagnostic;
use crate::Result;
use sqlx::PgPool;

pub struct DiagnosticsRepository;

impl DiagnosticsRepository {
    /// Server version string and active database name
    pub async fn probe(pool: &PgPool) -> Result<DbDiagnostic> {
        let (server_version,): (String,) = sqlx::query_as("SELECT version()")
            .fetch_one(pool)
            .await?;
        let (current_database,): (String,) = sqlx::query_as("SELECT current_database()::text")
            .fetch_one(pool)
            .await?;
        Ok(DbDiagnostic {
            server_version,
            current_database,
        })
    }
}
