//! OmniFocus MCP Server - Main Entry Point
//!
//! This is the main entry point for the OmniFocus MCP server application.
//! The actual implementation is in the `omnifocus_mcp` library.

use anyhow::Result;
use clap::Parser;
use mcp_attr::server::serve_stdio;
use omnifocus_mcp::{Config, OmniFocusServerHandler};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// OmniFocus MCP Server - OmniFocus task management via Model Context Protocol
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Refuse destructive operations unless a test database is open
    #[arg(long, env = "OMNIFOCUS_SAFETY_MODE")]
    safety_mode: bool,

    /// Substring the open database name must contain in safety mode
    #[arg(long)]
    database_marker: Option<String>,

    /// Re-read updated items and report fields that did not change
    #[arg(long)]
    verify_writes: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the MCP protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("omnifocus_mcp=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref())?;
    if args.safety_mode {
        config.safety.enabled = true;
    }
    if let Some(marker) = args.database_marker {
        config.safety.database_marker = marker;
    }
    if args.verify_writes {
        config.verify_writes = true;
    }
    config.validate()?;

    tracing::info!(
        application = %config.application,
        safety = config.safety.enabled,
        verify_writes = config.verify_writes,
        "starting OmniFocus MCP server"
    );

    let handler = OmniFocusServerHandler::new(config);
    serve_stdio(handler).await?;
    Ok(())
}
