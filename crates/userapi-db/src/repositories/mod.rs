mod diagnostics;
mod request_log;
mod user;

pub use diagnostics::DiagnosticsRepository;
pub use request_log::RequestLogRepository;
pub use user::UserRepository;
