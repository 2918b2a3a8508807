use crate::models::RequestAggregate;
use crate::Result;
use sqlx::PgPool;
use std::time::Duration;

pub struct RequestLogRepository;

impl RequestLogRepository {
    /// Append one audit row
    pub async fn insert(pool: &PgPool, endpoint: &str, method: &str, status_code: i32) -> Result<()> {
        sqlx::query("INSERT INTO app_logs (endpoint, method, status_code) VALUES ($1, $2, $3)")
            .bind(endpoint)
            .bind(method)
            .bind(status_code)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Group audit rows newer than `window` by endpoint, method and status,
    /// busiest group first
    pub async fn recent_aggregates(pool: &PgPool, window: Duration) -> Result<Vec<RequestAggregate>> {
        let results = sqlx::query_as::<_, RequestAggregate>(
            r#"
            SELECT endpoint, method, status_code, COUNT(*) AS count
            FROM app_logs
            WHERE timestamp > NOW() - make_interval(secs => $1)
            GROUP BY endpoint, method, status_code
            ORDER BY count DESC
            "#,
        )
        .bind(window.as_secs_f64())
        .fetch_all(pool)
        .await?;
        Ok(results)
    }
}
