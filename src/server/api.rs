//! Request handlers.

use std::time::{Duration, Instant};

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::error::ApiError;
use super::AppState;
use crate::error::PdfError;
use crate::pdf::merge::{merge_documents, MergeResult};
use crate::pdf::split::{split_document, ManifestEntry, SplitMode};
use crate::pdf::SourceFile;
use crate::workspace::{retained_file, Workspace};

const DEFAULT_MODE: &str = "single";

#[derive(Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

#[derive(Serialize)]
pub struct SplitData {
    pub total_files: usize,
    pub files: Vec<ManifestEntry>,
    pub session_id: Uuid,
}

#[derive(Serialize)]
pub struct MergeData {
    #[serde(flatten)]
    pub result: MergeResult,
    pub session_id: Uuid,
}

/// Handler: GET /
pub async fn handle_root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "PDF Cloud Service",
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
    })
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

/// Handler: POST /api/split
pub async fn handle_split(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<SplitData>>, ApiError> {
    let mut file = None;
    let mut mode = DEFAULT_MODE.to_string();
    let mut ranges = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(str::to_owned);
        match field_name.as_deref() {
            Some("file") => {
                let name = upload_name(field.file_name());
                let bytes = field.bytes().await?;
                file = Some(SourceFile::new(name, bytes.to_vec()));
            }
            Some("mode") => mode = field.text().await?,
            Some("ranges") => ranges = Some(field.text().await?),
            _ => {}
        }
    }

    let source =
        file.ok_or_else(|| ApiError::InvalidRequest("missing multipart field: file".into()))?;
    source.ensure_pdf()?;
    info!(file = %source.name, %mode, ranges = ?ranges, "split requested");

    let config = state.config.clone();
    let data = run_bounded(&state, move |deadline| {
        let workspace = Workspace::create(&config.workspace_root, config.retain_outputs)?
            .with_deadline(deadline);
        workspace.stage(&source.name, &source.bytes)?;

        let doc = source.open()?;
        let mode: SplitMode = mode.parse()?;
        let output = split_document(&doc, source.base_name(), mode, ranges.as_deref())?;

        for file in &output.files {
            workspace.write_output(file.entry.filename(), &file.bytes)?;
        }
        debug!(
            session = %workspace.id(),
            dir = %workspace.dir().display(),
            files = output.files.len(),
            "split written"
        );

        let files = output.manifest();
        Ok(SplitData {
            total_files: files.len(),
            files,
            session_id: workspace.commit(),
        })
    })
    .await?;

    let message = match data.files.first() {
        Some(ManifestEntry::Range { .. }) => {
            format!("Split into {} files by range", data.total_files)
        }
        _ => format!("Split {} pages", data.total_files),
    };

    Ok(Json(ApiResponse {
        success: true,
        message,
        data,
    }))
}

/// Handler: POST /api/merge
pub async fn handle_merge(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<MergeData>>, ApiError> {
    let mut sources = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("files") {
            let name = upload_name(field.file_name());
            let bytes = field.bytes().await?;
            sources.push(SourceFile::new(name, bytes.to_vec()));
        }
    }

    if sources.len() < 2 {
        return Err(PdfError::TooFewFiles {
            count: sources.len(),
        }
        .into());
    }
    for source in &sources {
        source.ensure_pdf()?;
    }
    info!(files = sources.len(), "merge requested");

    let config = state.config.clone();
    let count = sources.len();
    let data = run_bounded(&state, move |deadline| {
        let workspace = Workspace::create(&config.workspace_root, config.retain_outputs)?
            .with_deadline(deadline);
        for source in &sources {
            workspace.stage(&source.name, &source.bytes)?;
        }

        let output = merge_documents(&sources)?;
        workspace.write_output(&output.result.filename, &output.bytes)?;

        Ok(MergeData {
            result: output.result,
            session_id: workspace.commit(),
        })
    })
    .await?;

    Ok(Json(ApiResponse {
        success: true,
        message: format!("Merged {} PDF files", count),
        data,
    }))
}

/// Handler: GET /api/files/:session_id/:filename
pub async fn handle_download(
    State(state): State<AppState>,
    Path((session_id, filename)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.config.retain_outputs {
        return Err(ApiError::NotFound);
    }

    let path = retained_file(&state.config.workspace_root, &session_id, &filename)
        .ok_or(ApiError::NotFound)?;
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| ApiError::NotFound)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    ))
}

/// Run engine work off the async runtime, bounded by the configured timeout.
///
/// A timed-out job keeps running on the blocking pool; its result is
/// discarded. The job receives the deadline so its workspace is not
/// retained when it finishes late.
async fn run_bounded<T, F>(state: &AppState, job: F) -> Result<T, ApiError>
where
    F: FnOnce(Option<Instant>) -> Result<T, PdfError> + Send + 'static,
    T: Send + 'static,
{
    let limit = state.config.timeout_ms;
    let timeout = Duration::from_millis(limit);
    // None when the timeout is too far out to represent.
    let deadline = Instant::now().checked_add(timeout);
    let job = tokio::task::spawn_blocking(move || job(deadline));

    match tokio::time::timeout(timeout, job).await {
        Ok(Ok(result)) => result.map_err(ApiError::from),
        Ok(Err(join_err)) => Err(ApiError::Internal(join_err.to_string())),
        Err(_) => Err(ApiError::Timeout(limit)),
    }
}

fn upload_name(file_name: Option<&str>) -> String {
    file_name
        .and_then(|n| n.rsplit(&['/', '\\'][..]).next())
        .filter(|n| !n.is_empty())
        .unwrap_or("upload")
        .to_string()
}
