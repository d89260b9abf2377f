use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::pdf::merge::merge_documents;
use crate::pdf::split::{split_document, ManifestEntry, SplitMode};
use crate::pdf::SourceFile;

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PathRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfSplitRequest {
    #[schemars(description = "Path to the PDF file to split")]
    pub path: String,
    #[schemars(description = "Split mode: 'single' (one file per page) or 'range' (default: single)")]
    #[serde(default = "default_mode")]
    pub mode: String,
    #[schemars(description = "Page ranges for range mode (e.g., '1-3,5,8-10')")]
    pub ranges: Option<String>,
    #[schemars(description = "Directory to write the produced files into")]
    pub output_dir: String,
}

fn default_mode() -> String {
    "single".to_string()
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfMergeRequest {
    #[schemars(description = "Paths of the PDF files to merge, in order (at least 2)")]
    pub inputs: Vec<String>,
    #[schemars(description = "Output file path")]
    pub output: String,
}

#[derive(Debug, Clone)]
pub struct PdfServer {
    tool_router: ToolRouter<Self>,
}

impl PdfServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for PdfServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl PdfServer {
    #[tool(description = "Get the number of pages in a PDF")]
    fn pdf_page_count(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        let page_count = match open_pdf(&path) {
            Ok((_, doc)) => doc.page_count(),
            Err(e) => return format!("Error: {}", e),
        };
        let result = PageCountResult { path, page_count };
        serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
    }

    #[tool(description = "Split a PDF into one file per page ('single' mode) or one file per comma-separated range ('range' mode) and write them to a directory")]
    fn pdf_split(&self, Parameters(req): Parameters<PdfSplitRequest>) -> String {
        let (source, doc) = match open_pdf(&req.path) {
            Ok(opened) => opened,
            Err(e) => return format!("Error: {}", e),
        };
        let mode: SplitMode = match req.mode.parse() {
            Ok(m) => m,
            Err(e) => return format!("Error: {}", e),
        };

        let output = match split_document(&doc, source.base_name(), mode, req.ranges.as_deref()) {
            Ok(o) => o,
            Err(e) => return format!("Error: {}", e),
        };

        let dir = Path::new(&req.output_dir);
        if let Err(e) = std::fs::create_dir_all(dir) {
            return format!("Error: {}", e);
        }
        for file in &output.files {
            if let Err(e) = std::fs::write(dir.join(file.entry.filename()), &file.bytes) {
                return format!("Error: {}", e);
            }
        }

        let files = output.manifest();
        let result = SplitResult {
            output_dir: req.output_dir,
            total_files: files.len(),
            files,
        };
        serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
    }

    #[tool(description = "Merge two or more PDFs, in the given order, into a single file")]
    fn pdf_merge(&self, Parameters(req): Parameters<PdfMergeRequest>) -> String {
        let mut sources = Vec::with_capacity(req.inputs.len());
        for input in &req.inputs {
            let source = match SourceFile::read(input) {
                Ok(source) => source,
                Err(e) => return format!("Error: {}", e),
            };
            if let Err(e) = source.ensure_pdf() {
                return format!("Error: {}", e);
            }
            sources.push(source);
        }

        let merged = match merge_documents(&sources) {
            Ok(m) => m,
            Err(e) => return format!("Error: {}", e),
        };
        if let Err(e) = std::fs::write(&req.output, &merged.bytes) {
            return format!("Error: {}", e);
        }

        let result = MergeResult {
            output_path: req.output,
            page_count: merged.result.pages,
        };
        serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
    }
}

fn open_pdf(path: &str) -> Result<(SourceFile, crate::pdf::PdfDocument)> {
    let source = SourceFile::read(path)?;
    source.ensure_pdf()?;
    let doc = source.open()?;
    Ok((source, doc))
}

// Result types for MCP tools

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct PageCountResult {
    pub path: String,
    pub page_count: u32,
}

#[derive(Debug, Serialize)]
pub struct SplitResult {
    pub output_dir: String,
    pub total_files: usize,
    pub files: Vec<ManifestEntry>,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct MergeResult {
    pub output_path: String,
    pub page_count: u32,
}

#[tool_handler]
impl ServerHandler for PdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF page tools. Use pdf_page_count to inspect a document, pdf_split to \
                 break it into per-page or per-range files, and pdf_merge to concatenate \
                 several documents."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = PdfServer::new();
    info!("serving MCP tools on stdio");

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
