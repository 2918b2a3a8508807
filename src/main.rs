use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;
use userapi_api::{ApiConfig, ApiContext, ApiServer};
use userapi_db::{DatabaseConfig, DatabasePool, PgGateway};
use userapi_metrics::{MetricsConfig, MetricsServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (ignore if not found)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(Level::INFO.into())
                .add_directive("sqlx=warn".parse()?),
        )
        .init();

    info!("User API starting...");

    let db_config = DatabaseConfig::from_env();
    let api_config = ApiConfig::from_env();
    let metrics_config = MetricsConfig::from_env();

    info!(database = %db_config.target(), "Database config loaded");

    let pool = DatabasePool::new(&db_config);

    // Schema creation failure is not fatal; requests report the store state
    match pool.migrate().await {
        Ok(()) => info!("Database initialized successfully"),
        Err(e) => warn!(error = %e, "Database initialization failed"),
    }

    let gateway = Arc::new(PgGateway::new(pool.clone(), db_config));

    // Setup shutdown signal
    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    // Handle Ctrl+C
    let shutdown_tx_clone = shutdown_tx.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Shutdown signal received (Ctrl+C)");
        shutdown_tx_clone.send(()).ok();
    });

    // Start Metrics server (if enabled)
    if metrics_config.enabled {
        match userapi_metrics::init() {
            Ok(handle) => {
                let metrics_server = MetricsServer::new(metrics_config, handle);
                let rx = shutdown_tx.subscribe();
                tokio::spawn(async move {
                    if let Err(e) = metrics_server.run(wait_for_shutdown(rx)).await {
                        error!(error = %e, "Metrics server error");
                    }
                });
                info!("Metrics server started");
            }
            Err(e) => warn!(error = %e, "Failed to install metrics recorder, metrics disabled"),
        }
    }

    let api_server = ApiServer::new(api_config, ApiContext::new(gateway));
    if let Err(e) = api_server.run(wait_for_shutdown(shutdown_tx.subscribe())).await {
        error!(error = %e, "API server error");
        pool.close().await;
        std::process::exit(1);
    }

    // Graceful shutdown
    info!("Shutting down...");
    pool.close().await;
    info!("User API shutdown complete");

    Ok(())
}

/// Resolves on the first shutdown broadcast (or when the sender is gone)
async fn wait_for_shutdown(mut rx: broadcast::Receiver<()>) {
    rx.recv().await.ok();
}
