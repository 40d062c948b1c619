//! Settings status

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

const NOT_CONFIGURED_MESSAGE: &str = "Configure Facebook Page ID & Token before using this button.";

#[derive(Debug, Serialize)]
pub struct SettingsStatusResponse {
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// GET /settings/status
pub async fn settings_status(State(state): State<AppState>) -> Json<SettingsStatusResponse> {
    let configured = state.config.facebook_configured();

    Json(SettingsStatusResponse {
        configured,
        message: (!configured).then_some(NOT_CONFIGURED_MESSAGE),
    })
}
