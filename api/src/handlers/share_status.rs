//! Share status of a single post

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Extension, Json,
};

use crate::domain::entities::{Editor, PostId};
use crate::error::AppError;
use crate::render::status_cell;
use crate::AppState;

/// Check if the client wants JSON response
fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("application/json"))
        .unwrap_or(false)
}

/// GET /posts/:id/share-status
///
/// Plain text cell by default, `StatusCell` JSON with `Accept: application/json`.
pub async fn share_status(
    State(state): State<AppState>,
    editor: Option<Extension<Editor>>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let Extension(_editor) = editor.ok_or(AppError::Unauthorized)?;

    let post_id = PostId::parse(&raw_id)
        .ok_or_else(|| AppError::BadRequest("Invalid post ID".to_string()))?;

    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {}", post_id)))?;

    let cell = status_cell(&post.meta, &state.config.facebook_post_base_url);

    if wants_json(&headers) {
        Ok(Json(cell).into_response())
    } else {
        Ok(cell.to_string().into_response())
    }
}
