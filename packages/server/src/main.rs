use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use common::storage::filesystem::FilesystemFileStore;
use tracing::{Level, info};

use fileuploaded_server::config::AppConfig;
use fileuploaded_server::database::init_db;
use fileuploaded_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load().context("Failed to load config")?;

    let db = init_db(&config.database)
        .await
        .context("Failed to initialize database")?;

    let store = FilesystemFileStore::new(
        config.upload.dir.clone(),
        config.upload.staging_dir.clone(),
    )
    .await
    .context("Failed to prepare upload directories")?;
    info!(dir = %config.upload.dir.display(), "Storing uploads");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let state = AppState {
        db,
        store: Arc::new(store),
        config,
    };
    let app = fileuploaded_server::build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server started on port {}", addr.port());

    axum::serve(listener, app).await?;

    Ok(())
}
