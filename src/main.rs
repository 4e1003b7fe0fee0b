use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use papersort::api::{app_router, AppContext};
use papersort::config::{self, Config};
use papersort::pipeline::ClassificationEngine;
use papersort::storage::UploadStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = Config::from_env();

    // Model, vectorizer, and category table load once here; a mismatch
    // between them fails startup loudly instead of failing requests.
    let engine = match ClassificationEngine::load(&config) {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!(error = %e, "failed to initialize classification engine");
            std::process::exit(1);
        }
    };

    let uploads = match UploadStore::new(config.upload_dir.clone()) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(
                dir = %config.upload_dir.display(),
                error = %e,
                "failed to open upload directory"
            );
            std::process::exit(1);
        }
    };

    let ctx = AppContext::new(Arc::new(engine), Arc::new(uploads));
    let app = app_router(ctx);

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %config.bind_addr, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!(addr = %config.bind_addr, "listening");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
