use serde::{Deserialize, Serialize};
use userapi_db::models::{RequestAggregate, Stats};

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub user_count: i64,
    pub recent_requests: Vec<RequestAggregate>,
    pub database_status: String,
}

impl From<Stats> for StatsResponse {
    fn from(stats: Stats) -> Self {
        Self {
            user_count: stats.user_count,
            recent_requests: stats.recent_requests,
            database_status: "connected".to_string(),
        }
    }
}
