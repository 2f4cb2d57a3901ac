//! Server entry point: tracing, storage, predictor, then axum.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use strokeguard::api::{api_router, ApiContext};
use strokeguard::predictor::http::HttpPredictor;
use strokeguard::screening::SystemClock;
use strokeguard::{config, db};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let data_dir = config::data_dir();
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        tracing::error!(dir = %data_dir.display(), "cannot create data directory: {e}");
        std::process::exit(1);
    }

    // Open once at startup so migrations run (and fail) before we accept
    // traffic; request handlers open their own connections.
    let db_path = config::database_path();
    if let Err(e) = db::open_database(&db_path) {
        tracing::error!(db = %db_path.display(), "database initialization failed: {e}");
        std::process::exit(1);
    }
    tracing::info!(db = %db_path.display(), "database ready");

    let predictor = match build_predictor().await {
        Ok(p) => p,
        Err(e) => {
            tracing::error!("predictor setup failed: {e}");
            std::process::exit(1);
        }
    };

    let ctx = ApiContext::new(db_path, Arc::new(predictor), Arc::new(SystemClock));
    let app = api_router(ctx);

    let addr = config::bind_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(%addr, "cannot bind: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!(%addr, "listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("shutdown signal listener failed: {e}");
        return;
    }
    tracing::info!("shutdown signal received, draining connections");
}

/// Build the blocking HTTP predictor off the async runtime and probe it
/// once. An unreachable model is logged but not fatal; scoring calls
/// answer 503 until it comes up.
async fn build_predictor() -> Result<HttpPredictor, String> {
    let base_url = config::predictor_base_url();
    let timeout_secs = config::predictor_timeout_secs();

    tokio::task::spawn_blocking(move || {
        let predictor =
            HttpPredictor::new(&base_url, timeout_secs).map_err(|e| e.to_string())?;
        match predictor.health_check() {
            Ok(()) => tracing::info!(url = %base_url, "model-serving process is up"),
            Err(e) => {
                tracing::warn!(url = %base_url, "model-serving process unreachable: {e}")
            }
        }
        Ok(predictor)
    })
    .await
    .map_err(|e| format!("startup task failed: {e}"))?
}
