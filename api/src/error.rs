//! Unified error types for the publisher API
//!
//! This module defines error types for each layer:
//! - `DomainError`: Host platform and business rule errors
//! - `GraphError`: Graph API and image download errors
//! - `PublishError`: Failures of a publish attempt, reported to the trigger
//! - `AppError`: Errors of the supporting endpoints

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Host platform error: {0}")]
    Host(String),
}

/// Graph API client errors
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Non-2xx response, or a 2xx response without an object id
    #[error("API error: {status} - {body}")]
    Api {
        status: u16,
        message: Option<String>,
        body: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Response body exceeds {limit} bytes")]
    TooLarge { limit: u64 },
}

impl GraphError {
    /// `error.message` from the Graph API response, if one was returned
    pub fn upstream_message(&self) -> Option<&str> {
        match self {
            GraphError::Api {
                message: Some(message),
                ..
            } => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Failure of a publish attempt.
///
/// Precondition variants are returned before anything is written; the upstream
/// variants are returned after the failure outcome has been persisted.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Insufficient permissions")]
    PermissionDenied,

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Facebook Page ID or Token missing.")]
    NotConfigured,

    #[error("Post not found.")]
    NotFound,

    #[error("{0}")]
    UpstreamTransport(String),

    #[error("Facebook error: {0}")]
    UpstreamApi(String),

    #[error("No image available to upload: {0}")]
    NoImageAvailable(String),

    #[error("Host platform error: {0}")]
    Host(#[from] DomainError),

    /// The Graph post exists but the host did not store the outcome
    #[error("Posted as {remote_id} but the outcome could not be recorded: {source}")]
    NotRecorded {
        remote_id: String,
        source: DomainError,
    },
}

/// Body of every trigger response: `{success, data}`
#[derive(Debug, Serialize)]
pub struct AjaxBody {
    pub success: bool,
    pub data: String,
}

impl AjaxBody {
    pub fn success(data: impl Into<String>) -> Self {
        Self {
            success: true,
            data: data.into(),
        }
    }

    pub fn failure(data: impl Into<String>) -> Self {
        Self {
            success: false,
            data: data.into(),
        }
    }
}

impl IntoResponse for PublishError {
    fn into_response(self) -> Response {
        let status = match &self {
            PublishError::PermissionDenied => StatusCode::FORBIDDEN,
            PublishError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            PublishError::NotConfigured => StatusCode::PRECONDITION_FAILED,
            PublishError::NotFound => StatusCode::NOT_FOUND,
            PublishError::UpstreamTransport(_) => StatusCode::GATEWAY_TIMEOUT,
            PublishError::UpstreamApi(_) | PublishError::NoImageAvailable(_) => {
                StatusCode::BAD_GATEWAY
            }
            PublishError::Host(e) => {
                tracing::error!("Host error during publish: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            PublishError::NotRecorded { remote_id, source } => {
                tracing::error!(remote_id = %remote_id, "Unrecorded publish: {}", source);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(AjaxBody::failure(self.to_string()))).into_response()
    }
}

/// Application layer errors - used by the supporting HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Domain(DomainError::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "Not found", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Validation(msg)) => (
                StatusCode::BAD_REQUEST,
                "Validation error",
                Some(msg.clone()),
            ),
            AppError::Domain(DomainError::Host(msg)) => {
                tracing::error!("Host platform error: {}", msg);
                (StatusCode::BAD_GATEWAY, "Host platform error", None)
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "Bad request", Some(msg.clone()))
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized", None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not found", Some(msg.clone())),
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            details,
        });

        (status, body).into_response()
    }
}
