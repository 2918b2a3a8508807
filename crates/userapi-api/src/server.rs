use crate::audit::audit_requests;
use crate::config::ApiConfig;
use crate::handlers;
use crate::state::ApiContext;
use axum::{middleware, routing::get, Router};
use std::future::Future;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the application router over `ctx`.
///
/// Every routed request appends one audit row.
pub fn build_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/", get(handlers::health_check))
        .route("/health", get(handlers::health_check))
        .route(
            "/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/users/:id",
            get(handlers::get_user).delete(handlers::delete_user),
        )
        .route("/stats", get(handlers::get_stats))
        .route("/db-test", get(handlers::test_database))
        .route_layer(middleware::from_fn_with_state(ctx.clone(), audit_requests))
        .with_state(ctx)
}

/// REST API Server
pub struct ApiServer {
    config: ApiConfig,
    ctx: ApiContext,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(config: ApiConfig, ctx: ApiContext) -> Self {
        Self { config, ctx }
    }

    /// Serve until `shutdown` resolves
    pub async fn run<F>(self, shutdown: F) -> crate::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.address();

        // Build CORS layer
        let cors = if self.config.cors_enabled {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            CorsLayer::new()
        };

        let app = build_router(self.ctx)
            .layer(cors)
            .layer(TraceLayer::new_for_http());

        info!(address = %addr, "Starting REST API server");

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::ApiError::Server(e.to_string()))?;

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| crate::ApiError::Server(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;
    use userapi_db::{DatabaseConfig, InMemoryGateway};

    fn app() -> (Router, Arc<InMemoryGateway>) {
        let gateway = Arc::new(InMemoryGateway::new());
        (build_router(ApiContext::new(gateway.clone())), gateway)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_create_get_delete_scenario() {
        let (app, _) = app();

        let (status, body) = send(
            &app,
            "POST",
            "/users",
            Some(json!({"name": "Ann", "email": "ann@x.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user"]["id"], 1);
        assert_eq!(body["user"]["name"], "Ann");

        let (status, fetched) = send(&app, "GET", "/users/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["user"], body["user"]);

        let (status, deleted) = send(&app, "DELETE", "/users/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted["message"], "User deleted successfully");

        let (status, missing) = send(&app, "GET", "/users/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(missing["detail"], "User not found");
    }

    #[tokio::test]
    async fn test_duplicate_email_returns_conflict() {
        let (app, _) = app();
        let user = json!({"name": "Ann", "email": "ann@x.com"});

        let (status, _) = send(&app, "POST", "/users", Some(user.clone())).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, "POST", "/users", Some(user)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["detail"], "Email already exists");

        let (_, list) = send(&app, "GET", "/users", None).await;
        assert_eq!(list["count"], 1);
    }

    #[tokio::test]
    async fn test_missing_user_is_not_found() {
        let (app, _) = app();
        let (status, _) = send(&app, "GET", "/users/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, "DELETE", "/users/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_id_beyond_serial_range_is_not_found() {
        let (app, _) = app();
        for method in ["GET", "DELETE"] {
            let (status, body) = send(&app, method, "/users/3000000000", None).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body["detail"], "User not found");
        }
    }

    #[tokio::test]
    async fn test_list_users_newest_first_with_count() {
        let (app, _) = app();
        for name in ["a", "b", "c"] {
            send(
                &app,
                "POST",
                "/users",
                Some(json!({"name": name, "email": format!("{name}@x.com")})),
            )
            .await;
        }

        let (status, body) = send(&app, "GET", "/users", None).await;
        assert_eq!(status, StatusCode::OK);
        let users = body["users"].as_array().unwrap();
        assert_eq!(body["count"], users.len());
        let names: Vec<&str> = users.iter().map(|u| u["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn test_invalid_input_is_unprocessable() {
        let (app, _) = app();

        let (status, _) = send(
            &app,
            "POST",
            "/users",
            Some(json!({"name": "Ann", "email": "not-an-email"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send(&app, "POST", "/users", Some(json!({"name": "Ann"}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) = send(&app, "GET", "/users/abc", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"], "User id must be an integer");
    }

    #[tokio::test]
    async fn test_unreachable_store() {
        let (app, gateway) = app();
        gateway.set_available(false);

        let (status, body) = send(&app, "GET", "/users", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "Database connection failed");

        let (status, body) = send(&app, "GET", "/stats", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "Database connection failed");

        for uri in ["/", "/health"] {
            let (status, body) = send(&app, "GET", uri, None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["status"], "healthy");
            assert_eq!(body["database"], "disconnected");
        }

        let (status, body) = send(&app, "GET", "/db-test", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Cannot connect to database");
        assert_eq!(body["config"]["password"], "***");
        assert!(body["postgresql_version"].is_null());
    }

    #[tokio::test]
    async fn test_db_test_never_echoes_password() {
        let config = DatabaseConfig {
            password: "s3cret".to_string(),
            ..DatabaseConfig::default()
        };
        let gateway = Arc::new(InMemoryGateway::with_config(config));
        let app = build_router(ApiContext::new(gateway));

        let (status, body) = send(&app, "GET", "/db-test", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["current_database"], "appdb");
        assert_eq!(body["config"]["password"], "***");
        assert!(!body.to_string().contains("s3cret"));
    }

    #[tokio::test]
    async fn test_every_routed_request_is_audited() {
        let (app, gateway) = app();

        send(&app, "GET", "/health", None).await;
        send(
            &app,
            "POST",
            "/users",
            Some(json!({"name": "Ann", "email": "bad"})),
        )
        .await;
        send(&app, "GET", "/users/7", None).await;
        send(&app, "GET", "/db-test", None).await;
        send(&app, "GET", "/no-such-route", None).await;

        let logged: Vec<(String, String, i32)> = gateway
            .request_logs()
            .into_iter()
            .map(|l| (l.endpoint, l.method, l.status_code))
            .collect();
        assert_eq!(
            logged,
            vec![
                ("/health".to_string(), "GET".to_string(), 200),
                ("/users".to_string(), "POST".to_string(), 422),
                ("/users/7".to_string(), "GET".to_string(), 404),
                ("/db-test".to_string(), "GET".to_string(), 200),
            ]
        );
    }

    #[tokio::test]
    async fn test_audit_failure_does_not_fail_request() {
        let (app, gateway) = app();
        gateway.set_audit_log_available(false);

        let (status, _) = send(
            &app,
            "POST",
            "/users",
            Some(json!({"name": "Ann", "email": "ann@x.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(gateway.request_logs().is_empty());
    }

    #[tokio::test]
    async fn test_stats_aggregates_recent_requests() {
        let (app, _) = app();
        send(&app, "GET", "/users", None).await;
        send(&app, "GET", "/users", None).await;
        send(&app, "GET", "/health", None).await;
        send(
            &app,
            "POST",
            "/users",
            Some(json!({"name": "Ann", "email": "ann@x.com"})),
        )
        .await;

        let (status, body) = send(&app, "GET", "/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user_count"], 1);
        assert_eq!(body["database_status"], "connected");

        let recent = body["recent_requests"].as_array().unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0]["endpoint"], "/users");
        assert_eq!(recent[0]["method"], "GET");
        assert_eq!(recent[0]["count"], 2);
    }
}
