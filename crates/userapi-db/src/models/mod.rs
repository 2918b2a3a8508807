mod diagnostic;
mod request_log;
mod user;

pub use diagnostic::DbDiagnostic;
pub use request_log::{DbRequestLog, RequestAggregate, Stats};
pub use user::DbUser;
