use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tokio::sync::Notify;

mod api;
mod config;
mod error;
mod logging;
mod models;
mod parser;
mod storage;

use config::Config;
use storage::UploadStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    logging::init_logging();

    tracing::info!("logrenamer v{}", env!("CARGO_PKG_VERSION"));

    // 1. Make sure uploads have somewhere to land
    let store = UploadStore::new(&config.upload_dir);
    store
        .ensure_dir()
        .await
        .with_context(|| format!("failed to create upload dir {}", config.upload_dir.display()))?;

    // 2. Ctrl-C stops the server gracefully
    let shutdown = Arc::new(Notify::new());
    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown requested");
        }
        shutdown_for_signal.notify_one();
    });

    // 3. Serve
    let app = api::create_router(store, config.public_dir.clone(), config.max_upload_bytes());
    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!(
        addr = %bind_addr,
        upload_dir = %config.upload_dir.display(),
        public_dir = %config.public_dir.display(),
        "listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.notified().await;
        })
        .await
        .context("server error")?;

    Ok(())
}
