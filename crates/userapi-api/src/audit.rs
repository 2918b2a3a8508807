use crate::state::ApiContext;
use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn};
use userapi_db::Gateway;
use userapi_metrics::{counters, histograms};

/// Append one audit row per routed request, after the handler has produced
/// its final status. Unmatched paths are not audited.
pub async fn audit_requests(
    State(ctx): State<ApiContext>,
    request: Request,
    next: Next,
) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string());
    let endpoint = request.uri().path().to_string();
    let method = request.method().as_str().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let elapsed = start.elapsed();
    histograms::request_duration(elapsed, &method);

    if let Some(route) = route {
        counters::requests(&route, &method, status);
        info!(
            %method,
            %endpoint,
            status,
            elapsed_ms = elapsed.as_millis() as u64,
            "Handled request"
        );
        record(ctx.gateway.as_ref(), &endpoint, &method, status).await;
    }

    response
}

/// Best-effort audit write; a failure is logged and swallowed
pub async fn record(gateway: &dyn Gateway, endpoint: &str, method: &str, status: u16) {
    if let Err(e) = gateway.log_request(endpoint, method, status).await {
        counters::audit_log_failures();
        warn!(%endpoint, %method, status, error = %e, "Failed to write audit log");
    }
}
