pub mod handlers;
pub mod routes;
pub mod types;
pub mod upload;


use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::gemini::GeminiClient;
use types::AppState;

/// Binds the configured address and serves caption requests until the process stops.
pub async fn run(config: Config) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(&config.server.upload_dir).await?;

    let generator = GeminiClient::new(config.gemini.clone())?;
    let state = AppState {
        generator: Arc::new(generator),
        upload_dir: config.server.upload_dir.clone(),
    };
    let app = routes::create_router(state, config.server.max_upload_bytes);

    let listener =
        TcpListener::bind(format!("{}:{}", config.server.host, config.server.port)).await?;

    tracing::info!(
        "🚀 CaptionCraft server running on http://{}",
        listener.local_addr()?
    );
    tracing::info!(model = %config.gemini.model, upload_dir = %config.server.upload_dir.display(), "ready");

    axum::serve(listener, app).await?;

    Ok(())
}
