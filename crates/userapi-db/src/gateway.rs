use crate::config::{DatabaseConfig, RedactedConfig};
use crate::models::{DbDiagnostic, DbUser, Stats};
use crate::pool::DatabasePool;
use crate::repositories::{DiagnosticsRepository, RequestLogRepository, UserRepository};
use crate::{DatabaseError, Result};
use async_trait::async_trait;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::debug;
use userapi_metrics::{counters, histograms};

/// Audit rows newer than this are included in [`Gateway::stats`]
pub const STATS_WINDOW: Duration = Duration::from_secs(60 * 60);

/// Store operations behind the HTTP surface.
///
/// Every method runs one statement set and returns a [`DatabaseError`];
/// implementations must not leak driver error types.
#[async_trait]
pub trait Gateway: Send + Sync + 'static {
    /// All users, newest first
    async fn list_users(&self) -> Result<Vec<DbUser>>;

    /// Insert a user. `Conflict` when the email is taken.
    async fn create_user(&self, name: &str, email: &str) -> Result<DbUser>;

    /// `NotFound` when no row matches
    async fn get_user(&self, id: i32) -> Result<DbUser>;

    /// `NotFound` when nothing was deleted
    async fn delete_user(&self, id: i32) -> Result<()>;

    /// User count and audit aggregates over [`STATS_WINDOW`]
    async fn stats(&self) -> Result<Stats>;

    /// Server version and active database
    async fn test_connection(&self) -> Result<DbDiagnostic>;

    /// Whether the store answers at all
    async fn ping(&self) -> bool;

    /// Append one audit row
    async fn log_request(&self, endpoint: &str, method: &str, status_code: u16) -> Result<()>;

    /// Connection settings with the password masked
    fn redacted_config(&self) -> RedactedConfig;
}

/// PostgreSQL-backed gateway
#[derive(Clone)]
pub struct PgGateway {
    pool: DatabasePool,
    config: DatabaseConfig,
}

impl PgGateway {
    pub fn new(pool: DatabasePool, config: DatabaseConfig) -> Self {
        Self { pool, config }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    async fn timed<T, F>(&self, operation: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let start = Instant::now();
        let result = fut.await;
        histograms::db_query_duration(start.elapsed(), operation);
        if let Err(e) = &result {
            counters::db_errors(e.kind());
            debug!(operation, error = %e, "Store operation failed");
        }
        result
    }
}

#[async_trait]
impl Gateway for PgGateway {
    async fn list_users(&self) -> Result<Vec<DbUser>> {
        self.timed("list_users", UserRepository::get_all(self.pool.inner()))
            .await
    }

    async fn create_user(&self, name: &str, email: &str) -> Result<DbUser> {
        self.timed(
            "create_user",
            UserRepository::insert(self.pool.inner(), name, email),
        )
        .await
    }

    async fn get_user(&self, id: i32) -> Result<DbUser> {
        self.timed("get_user", async {
            UserRepository::get_by_id(self.pool.inner(), id)
                .await?
                .ok_or(DatabaseError::NotFound)
        })
        .await
    }

    async fn delete_user(&self, id: i32) -> Result<()> {
        self.timed("delete_user", async {
            if UserRepository::delete_by_id(self.pool.inner(), id).await? {
                Ok(())
            } else {
                Err(DatabaseError::NotFound)
            }
        })
        .await
    }

    async fn stats(&self) -> Result<Stats> {
        self.timed("stats", async {
            let user_count = UserRepository::count(self.pool.inner()).await?;
            let recent_requests =
                RequestLogRepository::recent_aggregates(self.pool.inner(), STATS_WINDOW).await?;
            Ok(Stats {
                user_count,
                recent_requests,
            })
        })
        .await
    }

    async fn test_connection(&self) -> Result<DbDiagnostic> {
        self.timed("test_connection", DiagnosticsRepository::probe(self.pool.inner()))
            .await
    }

    async fn ping(&self) -> bool {
        self.timed("ping", self.pool.health_check()).await.is_ok()
    }

    async fn log_request(&self, endpoint: &str, method: &str, status_code: u16) -> Result<()> {
        self.timed(
            "log_request",
            RequestLogRepository::insert(
                self.pool.inner(),
                endpoint,
                method,
                i32::from(status_code),
            ),
        )
        .await
    }

    fn redacted_config(&self) -> RedactedConfig {
        self.config.redacted()
    }
}
