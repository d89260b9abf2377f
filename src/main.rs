mod cli;
mod commands;
mod error;
mod mcp;
mod page_range;
mod pdf;
mod server;
mod workspace;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    // stdout belongs to command output and the MCP transport.
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Serve(args) => {
            server::run(args.into()).await?;
        }
        Commands::Mcp => {
            mcp::run_server().await?;
        }
        Commands::Info { path } => {
            commands::info::run(&path)?;
        }
        Commands::Split {
            path,
            mode,
            ranges,
            output_dir,
        } => {
            commands::split::run(&path, &mode, ranges.as_deref(), &output_dir)?;
        }
        Commands::Merge { inputs, output } => {
            commands::merge::run(&inputs, &output)?;
        }
    }

    Ok(())
}
