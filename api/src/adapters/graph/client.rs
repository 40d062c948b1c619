//! Graph API client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Serialize;
use urlencoding::encode;

use crate::domain::entities::{PageCredentials, RemoteObjectId};
use crate::domain::ports::{GraphClient, GraphObject, PhotoUpload};
use crate::error::GraphError;

/// Per-endpoint request timeouts
#[derive(Debug, Clone, Copy)]
pub struct GraphTimeouts {
    pub photo: Duration,
    pub comment: Duration,
    pub feed: Duration,
}

impl Default for GraphTimeouts {
    fn default() -> Self {
        Self {
            photo: Duration::from_secs(60),
            comment: Duration::from_secs(20),
            feed: Duration::from_secs(20),
        }
    }
}

/// Implementation of the Graph API client
pub struct GraphClientImpl {
    http: Client,
    base_url: String,
    version: Option<String>,
    timeouts: GraphTimeouts,
}

impl GraphClientImpl {
    pub fn new(base_url: String, version: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            version: version.filter(|v| !v.trim().is_empty()),
            timeouts: GraphTimeouts::default(),
        }
    }

    #[cfg(test)]
    pub fn with_timeouts(mut self, timeouts: GraphTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    fn api_url(&self, node: &str, edge: &str) -> String {
        match &self.version {
            Some(version) => format!("{}/{}/{}/{}", self.base_url, version, encode(node), edge),
            None => format!("{}/{}/{}", self.base_url, encode(node), edge),
        }
    }

    async fn handle_object_response(
        &self,
        response: reqwest::Response,
    ) -> Result<GraphObject, GraphError> {
        let status = response.status();
        let body = response.text().await.map_err(send_error)?;
        let parsed: Option<serde_json::Value> = serde_json::from_str(&body).ok();

        if status.is_success() {
            if let Some(id) = parsed.as_ref().and_then(object_id) {
                return Ok(GraphObject {
                    id: RemoteObjectId(id),
                });
            }
        }

        let message = parsed
            .as_ref()
            .and_then(|v| v.pointer("/error/message"))
            .and_then(|m| m.as_str())
            .map(str::to_string);

        Err(GraphError::Api {
            status: status.as_u16(),
            message,
            body,
        })
    }
}

/// Request types for the Graph API
#[derive(Serialize)]
struct FeedRequest<'a> {
    message: &'a str,
    link: &'a str,
    access_token: &'a str,
}

#[derive(Serialize)]
struct CommentRequest<'a> {
    message: &'a str,
    access_token: &'a str,
}

/// Non-empty `id` of a created object; the API returns strings but be lenient
fn object_id(value: &serde_json::Value) -> Option<String> {
    match value.get("id")? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn send_error(e: reqwest::Error) -> GraphError {
    if e.is_timeout() {
        GraphError::Timeout(e.to_string())
    } else {
        GraphError::Request(e)
    }
}

#[async_trait]
impl GraphClient for GraphClientImpl {
    async fn upload_photo(
        &self,
        page: &PageCredentials,
        caption: &str,
        photo: PhotoUpload<'_>,
    ) -> Result<GraphObject, GraphError> {
        let bytes = tokio::fs::read(photo.path).await?;
        let source = Part::bytes(bytes)
            .file_name(photo.file_name.to_string())
            .mime_str(photo.mime_type)?;

        let form = Form::new()
            .text("access_token", page.access_token().to_string())
            .text("caption", caption.to_string())
            .part("source", source);

        let response = self
            .http
            .post(self.api_url(page.page_id(), "photos"))
            .multipart(form)
            .timeout(self.timeouts.photo)
            .send()
            .await
            .map_err(send_error)?;

        self.handle_object_response(response).await
    }

    async fn add_comment(
        &self,
        page: &PageCredentials,
        object_id: &RemoteObjectId,
        message: &str,
    ) -> Result<GraphObject, GraphError> {
        let response = self
            .http
            .post(self.api_url(&object_id.0, "comments"))
            .form(&CommentRequest {
                message,
                access_token: page.access_token(),
            })
            .timeout(self.timeouts.comment)
            .send()
            .await
            .map_err(send_error)?;

        self.handle_object_response(response).await
    }

    async fn publish_feed(
        &self,
        page: &PageCredentials,
        message: &str,
        link: &str,
    ) -> Result<GraphObject, GraphError> {
        let response = self
            .http
            .post(self.api_url(page.page_id(), "feed"))
            .form(&FeedRequest {
                message,
                link,
                access_token: page.access_token(),
            })
            .timeout(self.timeouts.feed)
            .send()
            .await
            .map_err(send_error)?;

        self.handle_object_response(response).await
    }
}
