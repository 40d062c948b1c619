//! Editor authentication middleware

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use crate::AppState;

/// Extract the raw Authorization header; the host decides what it accepts
fn extract_authorization(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .filter(|h| !h.trim().is_empty())
}

/// Optional editor authentication middleware
///
/// Resolves the caller against the host platform and injects the `Editor`
/// into request extensions. Requests without valid credentials pass through
/// without one; handlers decide whether that is acceptable.
pub async fn optional_editor_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if let Some(authorization) = extract_authorization(&request) {
        match state.editors.resolve(authorization).await {
            Ok(Some(editor)) => {
                tracing::debug!(editor_id = %editor.id, "Resolved editor");
                request.extensions_mut().insert(editor);
            }
            Ok(None) => tracing::debug!("Host rejected caller credentials"),
            Err(e) => tracing::warn!(error = %e, "Failed to resolve editor"),
        }
    }

    next.run(request).await
}
