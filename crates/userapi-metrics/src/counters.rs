use metrics::{counter, describe_counter};

/// Initialize counter descriptions
pub fn init() {
    describe_counter!(
        "userapi_requests_total",
        "Total number of handled HTTP requests"
    );
    describe_counter!(
        "userapi_audit_log_failures_total",
        "Audit log rows that could not be written"
    );
    describe_counter!(
        "userapi_db_errors_total",
        "Total number of store errors by kind"
    );
}

/// Count a handled request by route, method and resulting status
pub fn requests(endpoint: &str, method: &str, status: u16) {
    counter!(
        "userapi_requests_total",
        "endpoint" => endpoint.to_string(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Increment audit log failure counter
pub fn audit_log_failures() {
    counter!("userapi_audit_log_failures_total").increment(1);
}

/// Increment store error counter
pub fn db_errors(kind: &str) {
    counter!("userapi_db_errors_total", "kind" => kind.to_string()).increment(1);
}
