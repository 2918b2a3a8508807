use crate::models::DbUser;
use crate::Result;
use sqlx::PgPool;

pub struct UserRepository;

impl UserRepository {
    /// Insert a user and return the stored row
    pub async fn insert(pool: &PgPool, name: &str, email: &str) -> Result<DbUser> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            INSERT INTO users (name, email)
            VALUES ($1, $2)
            RETURNING id, name, email, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .fetch_one(pool)
        .await?;
        Ok(user)
    }

    /// Get user by id
    pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<Option<DbUser>> {
        let result = sqlx::query_as::<_, DbUser>(
            "SELECT id, name, email, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(result)
    }

    /// Get all users, newest first
    pub async fn get_all(pool: &PgPool) -> Result<Vec<DbUser>> {
        let results = sqlx::query_as::<_, DbUser>(
            "SELECT id, name, email, created_at FROM users ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(pool)
        .await?;
        Ok(results)
    }

    /// Delete user by id, returning whether a row was removed
    pub async fn delete_by_id(pool: &PgPool, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count total users
    pub async fn count(pool: &PgPool) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
