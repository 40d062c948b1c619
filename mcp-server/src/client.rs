//! HTTP client for the publisher API
//!
//! Authenticates as a WordPress user with an application password. The API
//! resolves those credentials to an editor, so the trigger acts on their behalf.

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Action name expected by the trigger endpoint
const PUBLISH_ACTION: &str = "post_to_facebook";

#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("A post is already in progress")]
    Busy,

    #[error("Request error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response without a `{success, data}` body
    #[error("Request error: {0}")]
    Status(u16),

    #[error("Unexpected response: {0}")]
    Malformed(String),
}

/// `{success, data}` body returned by the trigger endpoint
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AjaxOutcome {
    pub success: bool,
    pub data: String,
}

/// HTTP client for communicating with the publisher API
#[derive(Clone)]
pub struct PublisherClient {
    client: reqwest::Client,
    base_url: String,
    username: String,
    app_password: String,
}

impl PublisherClient {
    /// Create a new client from environment variables
    ///
    /// Required env vars:
    /// - ONECLICK_WP_USER: WordPress user allowed to edit posts
    /// - ONECLICK_WP_APP_PASSWORD: Application password of that user
    ///
    /// Optional:
    /// - ONECLICK_API_URL: Base URL of the API (default http://localhost:8080)
    pub fn from_env() -> Result<Self> {
        let username =
            std::env::var("ONECLICK_WP_USER").context("ONECLICK_WP_USER not set")?;
        let app_password = std::env::var("ONECLICK_WP_APP_PASSWORD")
            .context("ONECLICK_WP_APP_PASSWORD not set")?;
        let base_url = std::env::var("ONECLICK_API_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string());

        Self::new(&base_url, &username, &app_password)
    }

    /// Create a new client with explicit configuration
    pub fn new(base_url: &str, username: &str, app_password: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            app_password: app_password.to_string(),
        })
    }

    #[cfg(test)]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch a fresh nonce and submit the publish trigger for `post_id`
    pub async fn post_to_facebook(&self, post_id: i64) -> Result<AjaxOutcome, TriggerError> {
        let nonce = self.fetch_nonce().await?;
        let post_id = post_id.to_string();

        let response = self
            .client
            .post(format!("{}/ajax", self.base_url))
            .basic_auth(&self.username, Some(&self.app_password))
            .form(&TriggerForm {
                action: PUBLISH_ACTION,
                nonce: &nonce,
                post_id: &post_id,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<AjaxOutcome>(&body) {
            Ok(outcome) => Ok(outcome),
            Err(_) if !status.is_success() => Err(TriggerError::Status(status.as_u16())),
            Err(_) => Err(TriggerError::Malformed(body)),
        }
    }

    /// Rendered share-status cell of a post
    pub async fn share_status(&self, post_id: i64) -> Result<String, TriggerError> {
        let response = self
            .client
            .get(format!("{}/posts/{}/share-status", self.base_url, post_id))
            .basic_auth(&self.username, Some(&self.app_password))
            .header(ACCEPT, "text/plain")
            .send()
            .await?;

        handle_text_response(response).await
    }

    async fn fetch_nonce(&self) -> Result<String, TriggerError> {
        let response = self
            .client
            .get(format!("{}/nonce", self.base_url))
            .basic_auth(&self.username, Some(&self.app_password))
            .send()
            .await?;

        let body = handle_text_response(response).await?;
        let parsed: NonceResponse =
            serde_json::from_str(&body).map_err(|_| TriggerError::Malformed(body))?;
        Ok(parsed.nonce)
    }
}

async fn handle_text_response(response: reqwest::Response) -> Result<String, TriggerError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(TriggerError::Status(status.as_u16()));
    }

    Ok(body)
}

// --- Request Types ---

#[derive(Debug, Serialize)]
struct TriggerForm<'a> {
    action: &'a str,
    nonce: &'a str,
    post_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct NonceResponse {
    nonce: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_nonce(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/nonce"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "nonce": "0a1b2c3d4e5f60718293",
                "action": "post_to_facebook"
            })))
            .mount(server)
            .await;
    }

    fn client(server: &MockServer) -> PublisherClient {
        PublisherClient::new(&server.uri(), "editor", "abcd efgh").unwrap()
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = PublisherClient::new("https://api.example.com/", "editor", "pw").unwrap();
        assert_eq!(client.base_url(), "https://api.example.com");
    }

    #[tokio::test]
    async fn post_to_facebook_submits_form_with_nonce() {
        let server = MockServer::start().await;
        mount_nonce(&server).await;
        Mock::given(method("POST"))
            .and(path("/ajax"))
            .and(body_string_contains("action=post_to_facebook"))
            .and(body_string_contains("nonce=0a1b2c3d4e5f60718293"))
            .and(body_string_contains("post_id=42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": "Link posted successfully! Post ID: 123_456"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = client(&server).post_to_facebook(42).await.unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.data, "Link posted successfully! Post ID: 123_456");
    }

    #[tokio::test]
    async fn failure_body_is_returned_as_outcome() {
        let server = MockServer::start().await;
        mount_nonce(&server).await;
        Mock::given(method("POST"))
            .and(path("/ajax"))
            .respond_with(ResponseTemplate::new(502).set_body_json(serde_json::json!({
                "success": false,
                "data": "Facebook error: Invalid OAuth token"
            })))
            .mount(&server)
            .await;

        let outcome = client(&server).post_to_facebook(42).await.unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.data, "Facebook error: Invalid OAuth token");
    }

    #[tokio::test]
    async fn non_json_error_reports_status() {
        let server = MockServer::start().await;
        mount_nonce(&server).await;
        Mock::given(method("POST"))
            .and(path("/ajax"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client(&server).post_to_facebook(42).await.unwrap_err();

        assert_eq!(err.to_string(), "Request error: 500");
    }

    #[tokio::test]
    async fn rejected_credentials_fail_before_trigger() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/nonce"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/ajax"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server).post_to_facebook(42).await.unwrap_err();

        assert!(matches!(err, TriggerError::Status(401)));
    }

    #[tokio::test]
    async fn share_status_returns_text_cell() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts/42/share-status"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Not shared"))
            .mount(&server)
            .await;

        let cell = client(&server).share_status(42).await.unwrap();

        assert_eq!(cell, "Not shared");
    }

    #[test]
    fn test_trigger_form_serialization() {
        let form = TriggerForm {
            action: PUBLISH_ACTION,
            nonce: "abc",
            post_id: "7",
        };
        let json = serde_json::to_string(&form).unwrap();
        assert_eq!(
            json,
            r#"{"action":"post_to_facebook","nonce":"abc","post_id":"7"}"#
        );
    }
}
