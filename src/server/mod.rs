//! HTTP front-end for the split and merge engines.
//!
//! Routes:
//! - `GET /` and `GET /health`: liveness
//! - `POST /api/split`: multipart `file`, `mode`, `ranges`
//! - `POST /api/merge`: multipart `files` (two or more)
//! - `GET /api/files/:session_id/:filename`: download a retained output

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

mod api;
mod error;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Parent directory of the per-request workspaces.
    pub workspace_root: PathBuf,
    /// Keep the outputs of successful requests for download.
    pub retain_outputs: bool,
    pub timeout_ms: u64,
    pub max_upload_bytes: usize,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
}

pub fn router(config: ServerConfig) -> Router {
    let max_upload = config.max_upload_bytes;
    let state = AppState {
        config: Arc::new(config),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(api::handle_root))
        .route("/health", get(api::handle_health))
        .route("/api/split", post(api::handle_split))
        .route("/api/merge", post(api::handle_merge))
        .route("/api/files/:session_id/:filename", get(api::handle_download))
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    std::fs::create_dir_all(&config.workspace_root)?;

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!(
        workspace = %config.workspace_root.display(),
        retain_outputs = config.retain_outputs,
        timeout_ms = config.timeout_ms,
        "starting PDF service"
    );

    let app = router(config);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
