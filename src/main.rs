//! Mail MCP Server
//!
//! A Model Context Protocol (MCP) server for Gmail integration.
//! Fetches, normalizes, and formats emails for LLM consumption.

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use mail_mcp_server::config::Config;
use mail_mcp_server::gmail::auth::Authenticator;
use mail_mcp_server::gmail::client::GmailClient;
use mail_mcp_server::mail::processor::MailProcessor;
use mail_mcp_server::mcp::server::McpServer;

/// Mail MCP Server
#[derive(Parser)]
#[command(name = "mail-mcp-server")]
#[command(author, version, about = "Mail MCP Server - A Model Context Protocol server for Gmail")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify provider connectivity and exit
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the JSON-RPC stream
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Missing credentials are fatal at startup
    let config = Config::from_env().context(
        "set GMAIL_CLIENT_ID, GMAIL_CLIENT_SECRET and GMAIL_REFRESH_TOKEN",
    )?;
    let platform = config.platform.clone();

    let authenticator = Authenticator::new(config)?;
    let gmail_client = Arc::new(GmailClient::new(Arc::new(authenticator)));
    let processor = Arc::new(MailProcessor::new(gmail_client, platform));

    match cli.command {
        Some(Commands::Check) => {
            processor
                .initialize()
                .await
                .context("connectivity check failed")?;
            eprintln!("Provider connection OK");
        }
        None => {
            let mut server = McpServer::new(processor);
            server.run_stdio().await?;
        }
    }

    Ok(())
}
