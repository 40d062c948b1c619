//! One-click publisher MCP server implementation
//!
//! Exposes the "Post to Facebook" button as a tool. Like the button, it is
//! disabled while a post is in flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::client::{PublisherClient, TriggerError};
use anyhow::Result;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{
    handler::server::tool::ToolRouter,
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use schemars::JsonSchema;
use serde::Deserialize;

/// One-click publisher MCP server
#[derive(Clone)]
pub struct OneClickServer {
    client: PublisherClient,
    in_flight: Arc<AtomicBool>,
    tool_router: ToolRouter<Self>,
}

/// Held while a publish request runs; clears the flag on drop
struct InFlight(Arc<AtomicBool>);

impl InFlight {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag.clone()))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl OneClickServer {
    pub fn from_env() -> Result<Self> {
        let client = PublisherClient::from_env()?;
        Ok(Self::new(client))
    }

    pub fn new(client: PublisherClient) -> Self {
        Self {
            client,
            in_flight: Arc::new(AtomicBool::new(false)),
            tool_router: Self::tool_router(),
        }
    }

    async fn publish(&self, post_id: i64) -> Result<CallToolResult, TriggerError> {
        let _guard = InFlight::acquire(&self.in_flight).ok_or(TriggerError::Busy)?;

        tracing::info!(post_id, "Posting to Facebook...");
        let outcome = self.client.post_to_facebook(post_id).await?;

        if outcome.success {
            Ok(CallToolResult::success(vec![Content::text(outcome.data)]))
        } else {
            tracing::warn!(post_id, message = %outcome.data, "Publish failed");
            Ok(CallToolResult::error(vec![Content::text(outcome.data)]))
        }
    }
}

// --- Tool Parameter Types ---

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PostParams {
    /// WordPress post ID
    pub post_id: i64,
}

#[tool_router]
impl OneClickServer {
    #[tool(
        description = "Publish a WordPress post to the configured Facebook Page. Uses the featured or open-graph image when available, otherwise posts a link."
    )]
    async fn post_to_facebook(
        &self,
        params: Parameters<PostParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.publish(params.0.post_id).await {
            Ok(result) => Ok(result),
            Err(e) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
        }
    }

    #[tool(description = "Show whether a post has been shared to Facebook, when, and where.")]
    async fn share_status(
        &self,
        params: Parameters<PostParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.client.share_status(params.0.post_id).await {
            Ok(cell) => Ok(CallToolResult::success(vec![Content::text(cell)])),
            Err(e) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
        }
    }
}

#[tool_handler]
impl ServerHandler for OneClickServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "fb-oneclick".into(),
                title: Some("One-click Facebook Publisher".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                r#"One-click Facebook Publisher

SETUP: Set ONECLICK_WP_USER and ONECLICK_WP_APP_PASSWORD to a WordPress user
that can edit posts. The page ID and token are configured on the API server.

TOOLS:
- 'post_to_facebook' - Share a post. Photo post with the link as a comment when
  the post has an image, link post otherwise.
- 'share_status' - Shared / Not shared, with time and link when available

Only one post can be in progress at a time."#
                    .into(),
            ),
        }
    }
}
