use metrics::{describe_histogram, histogram};
use std::time::Duration;

/// Initialize histogram descriptions
pub fn init() {
    describe_histogram!(
        "userapi_db_query_duration_seconds",
        "Time for database operations"
    );
    describe_histogram!(
        "userapi_request_duration_seconds",
        "Time to handle an HTTP request"
    );
}

/// Record database operation duration
pub fn db_query_duration(duration: Duration, operation: &'static str) {
    histogram!("userapi_db_query_duration_seconds", "operation" => operation)
        .record(duration.as_secs_f64());
}

/// Record request handling duration
pub fn request_duration(duration: Duration, method: &str) {
    histogram!("userapi_request_duration_seconds", "method" => method.to_string())
        .record(duration.as_secs_f64());
}
