//! Shared-status cell for the post list

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::entities::{REMOTE_ID_KEY, SHARED_AT_FORMAT, SHARED_AT_KEY, SHARED_FLAG_KEY};

const DISPLAY_FORMAT: &str = "%B %-d, %Y %H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareState {
    Shared,
    NotShared,
    /// Never attempted
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCell {
    pub state: ShareState,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl StatusCell {
    fn plain(state: ShareState, label: &'static str) -> Self {
        Self {
            state,
            label,
            shared_at: None,
            link: None,
        }
    }
}

impl std::fmt::Display for StatusCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)?;
        if let Some(shared_at) = &self.shared_at {
            write!(f, "\n{}", shared_at)?;
        }
        if let Some(link) = &self.link {
            write!(f, "\n{}", link)?;
        }
        Ok(())
    }
}

/// Build the cell from a post's metadata.
///
/// `post_base_url` is prefixed to the stored remote id to form the link.
pub fn status_cell(meta: &HashMap<String, String>, post_base_url: &str) -> StatusCell {
    let value = |key: &str| {
        meta.get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    };

    match value(SHARED_FLAG_KEY) {
        Some("1") => StatusCell {
            state: ShareState::Shared,
            label: "Shared",
            shared_at: value(SHARED_AT_KEY).map(format_shared_at),
            link: value(REMOTE_ID_KEY).map(|id| post_link(post_base_url, id)),
        },
        Some("0") => StatusCell::plain(ShareState::NotShared, "Not shared"),
        _ => StatusCell::plain(ShareState::Unknown, "—"),
    }
}

/// Human-readable timestamp; unparseable values are shown as stored
fn format_shared_at(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, SHARED_AT_FORMAT)
        .map(|t| t.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn post_link(base: &str, remote_id: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), remote_id)
}
