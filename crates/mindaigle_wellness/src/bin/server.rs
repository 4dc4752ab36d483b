use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

use mindaigle_store_client::HealthStore;
use mindaigle_store_client::config::{StoreBackend, StoreConfig};
use mindaigle_store_client::http_client::ReqwestHealthStore;
use mindaigle_store_client::memory::InMemoryHealthStore;
use mindaigle_store_client::retry::RetryPolicy;
use mindaigle_wellness::{
    AppState, InstrumentedStore, RouterLimits, ServerConfig, WellnessService, router,
};

fn build_store(config: StoreConfig) -> Result<Arc<dyn HealthStore>, anyhow::Error> {
    let store: Arc<dyn HealthStore> = match config.backend {
        StoreBackend::Memory => {
            tracing::warn!("MINDAIGLE_STORE_URL not set; using in-memory store");
            Arc::new(InstrumentedStore::new(InMemoryHealthStore::new()))
        }
        StoreBackend::Http { base_url, api_key } => {
            info!(%base_url, max_retries = config.max_retries, "using document store");
            let client = ReqwestHealthStore::new(&base_url, api_key)?
                .with_retry_policy(RetryPolicy::with_max_retries(config.max_retries));
            Arc::new(InstrumentedStore::new(client))
        }
    };
    Ok(store)
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = ServerConfig::from_env();

    // Compact, human-friendly output; filter from `MINDAIGLE_LOG_LEVEL` or `RUST_LOG`.
    let env_filter = tracing_subscriber::EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .compact()
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
    tracing::info!(log_filter = %config.log_filter, "mindaigle_wellness:http: log filter");

    let handle = PrometheusBuilder::new().install_recorder()?;

    let store = match StoreConfig::from_env().map_err(anyhow::Error::from).and_then(build_store) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("invalid store configuration: {e}");
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState::new(WellnessService::new(store)).with_metrics(handle));
    let app = router(
        state,
        RouterLimits {
            max_body_size: config.max_body_size,
            request_timeout: config.request_timeout,
        },
    );

    let addr = config.address;
    info!(%addr, max_body_bytes = config.max_body_size, "starting HTTP server");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to address {addr}: {e}");
            std::process::exit(1);
        }
    };

    let server = axum::serve(listener, app.into_make_service());
    if let Err(e) = server
        .with_graceful_shutdown(async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!("failed to install ctrl+c handler: {e}");
            }
        })
        .await
    {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }

    Ok(())
}
