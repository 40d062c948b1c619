//! Anti-forgery token issuance

use axum::{extract::State, Extension, Json};
use serde::Serialize;

use crate::app::PUBLISH_ACTION;
use crate::domain::entities::Editor;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct NonceResponse {
    pub nonce: String,
    pub action: &'static str,
}

/// GET /nonce
///
/// Issues a token for the publish action, bound to the calling editor.
pub async fn issue_nonce(
    State(state): State<AppState>,
    editor: Option<Extension<Editor>>,
) -> Result<Json<NonceResponse>, AppError> {
    let Extension(editor) = editor.ok_or(AppError::Unauthorized)?;

    Ok(Json(NonceResponse {
        nonce: state.nonces.issue(PUBLISH_ACTION, editor.id),
        action: PUBLISH_ACTION,
    }))
}
