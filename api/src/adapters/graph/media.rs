//! HTTP image downloader

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};

use crate::domain::ports::{DownloadedImage, MediaFetcher};
use crate::error::GraphError;

/// Largest image accepted, the Graph API photo upload limit
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

pub struct HttpMediaFetcher {
    http: Client,
    timeout: Duration,
    max_bytes: u64,
}

impl HttpMediaFetcher {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
            timeout: Duration::from_secs(20),
            max_bytes: MAX_IMAGE_BYTES,
        }
    }

    #[cfg(test)]
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    #[cfg(test)]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for HttpMediaFetcher {
    fn default() -> Self {
        Self::new()
    }
}

fn read_error(e: reqwest::Error) -> GraphError {
    if e.is_timeout() {
        GraphError::Timeout(e.to_string())
    } else {
        GraphError::Request(e)
    }
}

#[async_trait]
impl MediaFetcher for HttpMediaFetcher {
    async fn download(&self, url: &str) -> Result<DownloadedImage, GraphError> {
        let mut response = self
            .http
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(read_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GraphError::Api {
                status: status.as_u16(),
                message: None,
                body: response.text().await.unwrap_or_default(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let too_large = GraphError::TooLarge {
            limit: self.max_bytes,
        };
        if response.content_length().is_some_and(|len| len > self.max_bytes) {
            return Err(too_large);
        }

        // Content-Length is advisory; enforce the cap on the body as well
        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(read_error)? {
            if (bytes.len() + chunk.len()) as u64 > self.max_bytes {
                return Err(too_large);
            }
            bytes.extend_from_slice(&chunk);
        }

        tracing::debug!(url, size = bytes.len(), content_type = ?content_type, "Downloaded image");

        Ok(DownloadedImage { bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::test_utils::TEST_PNG;

    #[tokio::test]
    async fn download_returns_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/uploads/og.png"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/png")
                    .set_body_bytes(TEST_PNG),
            )
            .mount(&server)
            .await;

        let image = HttpMediaFetcher::new()
            .download(&format!("{}/uploads/og.png", server.uri()))
            .await
            .unwrap();

        assert_eq!(image.bytes, TEST_PNG);
    }

    #[tokio::test]
    async fn download_reports_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/uploads/missing.png"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = HttpMediaFetcher::new()
            .download(&format!("{}/uploads/missing.png", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, GraphError::Api { status: 404, .. }));
    }

    #[tokio::test]
    async fn download_rejects_oversized_image() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/uploads/huge.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 4096]))
            .mount(&server)
            .await;

        let err = HttpMediaFetcher::new()
            .with_max_bytes(1024)
            .download(&format!("{}/uploads/huge.png", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, GraphError::TooLarge { limit: 1024 }));
    }

    #[tokio::test]
    async fn download_accepts_image_at_the_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/uploads/exact.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; 1024]))
            .mount(&server)
            .await;

        let image = HttpMediaFetcher::new()
            .with_max_bytes(1024)
            .download(&format!("{}/uploads/exact.png", server.uri()))
            .await
            .unwrap();

        assert_eq!(image.bytes.len(), 1024);
    }

    #[tokio::test]
    async fn slow_download_is_a_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/uploads/slow.png"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(TEST_PNG)
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let err = HttpMediaFetcher::new()
            .with_timeout(Duration::from_millis(50))
            .download(&format!("{}/uploads/slow.png", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, GraphError::Timeout(_)));
    }
}
