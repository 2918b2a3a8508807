mod diagnostic;
mod health;
mod stats;
mod user;

pub use diagnostic::DatabaseTestResponse;
pub use health::HealthResponse;
pub use stats::StatsResponse;
pub use user::{CreateUserRequest, MessageResponse, User, UserResponse, UsersResponse};
