//! One-click publisher MCP server
//!
//! Trigger adapter for the publisher API. Exposes tools for:
//! - Posting a WordPress post to the Facebook Page
//! - Checking a post's share status

mod client;
mod server;

use anyhow::Result;
use rmcp::ServiceExt;
use server::OneClickServer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging to stderr (stdout is used for MCP protocol)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting one-click publisher MCP server");

    let server = OneClickServer::from_env()?;

    // Serve over stdio - pass as tuple (stdin, stdout)
    let transport = (tokio::io::stdin(), tokio::io::stdout());
    let service = server.serve(transport).await?;

    // Wait for shutdown
    service.waiting().await?;

    Ok(())
}
