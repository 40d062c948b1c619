//! Trigger endpoint
//!
//! Form-encoded `{action, nonce, post_id}` posted by the editor button. The
//! one supported action is routed to the publish service; every response is
//! an `AjaxBody`.

use axum::{
    extract::{rejection::FormRejection, State},
    Extension, Form, Json,
};
use serde::Deserialize;

use crate::app::{PublishCommand, PUBLISH_ACTION};
use crate::domain::entities::Editor;
use crate::error::{AjaxBody, PublishError};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AjaxRequest {
    #[serde(default)]
    pub action: String,
    pub nonce: Option<String>,
    pub post_id: Option<String>,
}

/// POST /ajax
pub async fn ajax(
    State(state): State<AppState>,
    editor: Option<Extension<Editor>>,
    form: Result<Form<AjaxRequest>, FormRejection>,
) -> Result<Json<AjaxBody>, PublishError> {
    let Form(request) = form.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Rejected malformed trigger body");
        PublishError::InvalidRequest("Invalid request".to_string())
    })?;

    if request.action != PUBLISH_ACTION {
        tracing::debug!(action = %request.action, "Rejected unknown action");
        return Err(PublishError::InvalidRequest("Unknown action".to_string()));
    }

    // Settings are read per attempt
    let credentials = state.config.page_credentials();
    let command = PublishCommand {
        nonce: request.nonce.as_deref(),
        post_id: request.post_id.as_deref(),
    };

    let report = state
        .publish_service
        .publish(
            editor.as_ref().map(|Extension(e)| e),
            command,
            credentials.as_ref(),
        )
        .await?;

    Ok(Json(AjaxBody::success(report.to_string())))
}

