mod diagnostics;
mod health;
mod stats;
mod users;

pub use diagnostics::test_database;
pub use health::health_check;
pub use stats::get_stats;
pub use users::{create_user, delete_user, get_user, list_users};
