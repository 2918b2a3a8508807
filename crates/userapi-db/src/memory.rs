use crate::config::{DatabaseConfig, RedactedConfig};
use crate::gateway::{Gateway, STATS_WINDOW};
use crate::models::{DbDiagnostic, DbRequestLog, DbUser, RequestAggregate, Stats};
use crate::{DatabaseError, Result};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

#[derive(Default)]
struct State {
    users: Vec<DbUser>,
    logs: Vec<DbRequestLog>,
    next_user_id: i32,
    next_log_id: i32,
}

/// Gateway backed by process memory.
///
/// Mirrors the Postgres semantics (unique emails, serial ids, rolling stats
/// window) and can simulate an unreachable store or a broken audit log.
pub struct InMemoryGateway {
    state: RwLock<State>,
    config: DatabaseConfig,
    available: AtomicBool,
    audit_log_available: AtomicBool,
}

impl Default for InMemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::with_config(DatabaseConfig::default())
    }

    pub fn with_config(config: DatabaseConfig) -> Self {
        Self {
            state: RwLock::new(State {
                next_user_id: 1,
                next_log_id: 1,
                ..State::default()
            }),
            config,
            available: AtomicBool::new(true),
            audit_log_available: AtomicBool::new(true),
        }
    }

    /// Make every operation fail as if the server were down
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Make only audit log writes fail
    pub fn set_audit_log_available(&self, available: bool) {
        self.audit_log_available.store(available, Ordering::SeqCst);
    }

    /// Snapshot of all audit rows, oldest first
    pub fn request_logs(&self) -> Vec<DbRequestLog> {
        self.read().map(|s| s.logs.clone()).unwrap_or_default()
    }

    /// Append an audit row with an explicit timestamp
    #[cfg(test)]
    fn log_request_at(
        &self,
        endpoint: &str,
        method: &str,
        status_code: u16,
        timestamp: NaiveDateTime,
    ) -> Result<()> {
        self.push_log(endpoint, method, status_code, timestamp)
    }

    fn push_log(
        &self,
        endpoint: &str,
        method: &str,
        status_code: u16,
        timestamp: NaiveDateTime,
    ) -> Result<()> {
        let mut state = self.write()?;
        let id = state.next_log_id;
        state.next_log_id += 1;
        state.logs.push(DbRequestLog {
            id,
            endpoint: endpoint.to_string(),
            method: method.to_string(),
            status_code: i32::from(status_code),
            timestamp,
        });
        Ok(())
    }

    fn check_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DatabaseError::Connection(format!(
                "connection refused: {}",
                self.config.target()
            )))
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, State>> {
        self.check_available()?;
        self.state
            .read()
            .map_err(|e| DatabaseError::Query(e.to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, State>> {
        self.check_available()?;
        self.state
            .write()
            .map_err(|e| DatabaseError::Query(e.to_string()))
    }
}

#[async_trait]
impl Gateway for InMemoryGateway {
    async fn list_users(&self) -> Result<Vec<DbUser>> {
        let state = self.read()?;
        let mut users = state.users.clone();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(users)
    }

    async fn create_user(&self, name: &str, email: &str) -> Result<DbUser> {
        let mut state = self.write()?;
        if state.users.iter().any(|u| u.email == email) {
            return Err(DatabaseError::Conflict(format!(
                "duplicate key value violates unique constraint on email: {email}"
            )));
        }
        let user = DbUser {
            id: state.next_user_id,
            name: name.to_string(),
            email: email.to_string(),
            created_at: Utc::now().naive_utc(),
        };
        state.next_user_id += 1;
        state.users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: i32) -> Result<DbUser> {
        self.read()?
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(DatabaseError::NotFound)
    }

    async fn delete_user(&self, id: i32) -> Result<()> {
        let mut state = self.write()?;
        let before = state.users.len();
        state.users.retain(|u| u.id != id);
        if state.users.len() < before {
            Ok(())
        } else {
            Err(DatabaseError::NotFound)
        }
    }

    async fn stats(&self) -> Result<Stats> {
        let state = self.read()?;
        let window = chrono::Duration::from_std(STATS_WINDOW)
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        let cutoff = Utc::now().naive_utc() - window;

        let mut groups: HashMap<(String, String, i32), i64> = HashMap::new();
        for log in state.logs.iter().filter(|l| l.timestamp > cutoff) {
            *groups
                .entry((log.endpoint.clone(), log.method.clone(), log.status_code))
                .or_default() += 1;
        }

        let mut recent_requests: Vec<RequestAggregate> = groups
            .into_iter()
            .map(|((endpoint, method, status_code), count)| RequestAggregate {
                endpoint,
                method,
                status_code,
                count,
            })
            .collect();
        recent_requests.sort_by(|a, b| b.count.cmp(&a.count));

        Ok(Stats {
            user_count: state.users.len() as i64,
            recent_requests,
        })
    }

    async fn test_connection(&self) -> Result<DbDiagnostic> {
        self.check_available()?;
        Ok(DbDiagnostic {
            server_version: "in-memory".to_string(),
            current_database: self.config.database.clone(),
        })
    }

    async fn ping(&self) -> bool {
        self.check_available().is_ok()
    }

    async fn log_request(&self, endpoint: &str, method: &str, status_code: u16) -> Result<()> {
        if !self.audit_log_available.load(Ordering::SeqCst) {
            return Err(DatabaseError::Query("app_logs is unavailable".to_string()));
        }
        self.push_log(endpoint, method, status_code, Utc::now().naive_utc())
    }

    fn redacted_config(&self) -> RedactedConfig {
        self.config.redacted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let gateway = InMemoryGateway::new();
        let created = gateway.create_user("Ann", "ann@x.com").await.unwrap();
        assert_eq!(created.id, 1);

        let fetched = gateway.get_user(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let gateway = InMemoryGateway::new();
        gateway.create_user("Ann", "ann@x.com").await.unwrap();

        let err = gateway.create_user("Other", "ann@x.com").await.unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
        assert_eq!(gateway.stats().await.unwrap().user_count, 1);
    }

    #[tokio::test]
    async fn test_missing_rows_are_not_found() {
        let gateway = InMemoryGateway::new();
        assert!(matches!(
            gateway.get_user(42).await,
            Err(DatabaseError::NotFound)
        ));
        assert!(matches!(
            gateway.delete_user(42).await,
            Err(DatabaseError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let gateway = InMemoryGateway::new();
        for i in 0..3 {
            gateway
                .create_user(&format!("user{i}"), &format!("user{i}@x.com"))
                .await
                .unwrap();
        }

        let ids: Vec<i32> = gateway
            .list_users()
            .await
            .unwrap()
            .iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_stats_groups_by_descending_count() {
        let gateway = InMemoryGateway::new();
        gateway.log_request("/users", "GET", 200).await.unwrap();
        gateway.log_request("/health", "GET", 200).await.unwrap();
        gateway.log_request("/users", "GET", 200).await.unwrap();
        gateway.log_request("/users", "GET", 500).await.unwrap();

        let stats = gateway.stats().await.unwrap();
        assert_eq!(stats.recent_requests.len(), 3);
        assert_eq!(
            stats.recent_requests[0],
            RequestAggregate {
                endpoint: "/users".to_string(),
                method: "GET".to_string(),
                status_code: 200,
                count: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_stats_ignores_rows_older_than_window() {
        let gateway = InMemoryGateway::new();
        let two_hours_ago = Utc::now().naive_utc() - chrono::Duration::hours(2);
        gateway
            .log_request_at("/users", "GET", 200, two_hours_ago)
            .unwrap();
        gateway
            .log_request_at("/users", "GET", 200, two_hours_ago)
            .unwrap();
        gateway.log_request("/health", "GET", 200).await.unwrap();

        let stats = gateway.stats().await.unwrap();
        assert_eq!(
            stats.recent_requests,
            vec![RequestAggregate {
                endpoint: "/health".to_string(),
                method: "GET".to_string(),
                status_code: 200,
                count: 1,
            }]
        );
        assert_eq!(gateway.request_logs().len(), 3);
    }

    #[tokio::test]
    async fn test_unavailable_store_reports_connection_error() {
        let gateway = InMemoryGateway::new();
        gateway.set_available(false);

        assert!(!gateway.ping().await);
        assert!(matches!(
            gateway.list_users().await,
            Err(DatabaseError::Connection(_))
        ));
        assert_eq!(gateway.redacted_config().password, "***");
    }
}
