use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::server::ServerConfig;

#[derive(Parser)]
#[command(name = "pdfcloud")]
#[command(about = "Split and merge PDFs over HTTP, MCP or the command line")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP service
    Serve(ServeArgs),

    /// Run as MCP server over stdio
    Mcp,

    /// Print the page count of a PDF
    Info {
        /// PDF file to inspect
        path: PathBuf,
    },

    /// Split a PDF into one file per page or per range
    #[command(alias = "burst")]
    Split {
        /// PDF file to split
        path: PathBuf,

        /// Split mode: "single" or "range"
        #[arg(short, long, default_value = "single")]
        mode: String,

        /// Page ranges for range mode (e.g., "1-3,5,8-10")
        #[arg(short, long)]
        ranges: Option<String>,

        /// Output directory
        #[arg(short, long)]
        output_dir: PathBuf,
    },

    /// Combine two or more PDFs into one
    Merge {
        /// PDF files to merge, in order
        #[arg(required = true, num_args = 2..)]
        inputs: Vec<PathBuf>,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Host address to bind to
    #[arg(long, env = "PDFCLOUD_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PDFCLOUD_PORT", default_value = "8000")]
    pub port: u16,

    /// Directory holding per-request workspaces [default: <tmp>/pdf-service]
    #[arg(long, env = "PDFCLOUD_WORKSPACE")]
    pub workspace_root: Option<PathBuf>,

    /// Keep outputs of successful requests available for download
    #[arg(long, env = "PDFCLOUD_RETAIN_OUTPUTS")]
    pub retain_outputs: bool,

    /// Per-request processing timeout in milliseconds
    #[arg(long, env = "PDFCLOUD_TIMEOUT_MS", default_value = "30000")]
    pub timeout_ms: u64,

    /// Maximum request body size in megabytes
    #[arg(long, env = "PDFCLOUD_MAX_UPLOAD_MB", default_value = "100")]
    pub max_upload_mb: usize,
}

impl From<ServeArgs> for ServerConfig {
    fn from(args: ServeArgs) -> Self {
        ServerConfig {
            host: args.host,
            port: args.port,
            workspace_root: args
                .workspace_root
                .unwrap_or_else(|| std::env::temp_dir().join("pdf-service")),
            retain_outputs: args.retain_outputs,
            timeout_ms: args.timeout_ms,
            max_upload_bytes: args.max_upload_mb.saturating_mul(1024 * 1024),
        }
    }
}
