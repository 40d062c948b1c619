//! Publish domain types
//!
//! Credentials, the ephemeral request built per attempt, and the outcome
//! persisted on the post afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Meta key holding the shared flag ("0" / "1")
pub const SHARED_FLAG_KEY: &str = "_fb_oneclick_shared";
/// Meta key holding the remote object identifier
pub const REMOTE_ID_KEY: &str = "_fb_oneclick_post_id";
/// Meta key holding the time of the successful share
pub const SHARED_AT_KEY: &str = "_fb_oneclick_shared_at";

/// Storage format of `SHARED_AT_KEY`
pub const SHARED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Facebook Page credentials, injected per attempt
#[derive(Clone)]
pub struct PageCredentials {
    page_id: String,
    access_token: String,
}

impl PageCredentials {
    /// Build credentials from raw settings values.
    ///
    /// Values are trimmed; returns `None` when either is empty.
    pub fn new(page_id: &str, access_token: &str) -> Option<Self> {
        let page_id = page_id.trim();
        let access_token = access_token.trim();
        if page_id.is_empty() || access_token.is_empty() {
            return None;
        }
        Some(Self {
            page_id: page_id.to_string(),
            access_token: access_token.to_string(),
        })
    }

    pub fn page_id(&self) -> &str {
        &self.page_id
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl std::fmt::Debug for PageCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageCredentials")
            .field("page_id", &self.page_id)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Content resolved from a post, ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pub message: String,
    pub link: String,
    pub image_url: Option<String>,
}

/// Opaque identifier returned by the Graph API for a created object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteObjectId(pub String);

impl std::fmt::Display for RemoteObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a post ended up on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishStrategy {
    /// Photo upload with the link attached as a comment
    Photo,
    /// Feed post with a link, no image available
    Link,
    /// Feed post after the photo path failed
    LinkFallback,
}

impl std::fmt::Display for PublishStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PublishStrategy::Photo => write!(f, "photo"),
            PublishStrategy::Link => write!(f, "link"),
            PublishStrategy::LinkFallback => write!(f, "link_fallback"),
        }
    }
}

/// Outcome of one attempt, persisted on the post.
///
/// A shared outcome always carries the remote identifier and timestamp, so the
/// three stored fields can never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Shared {
        remote_post_id: RemoteObjectId,
        shared_at: DateTime<Utc>,
    },
    NotShared,
}

impl PublishOutcome {
    pub fn is_shared(&self) -> bool {
        matches!(self, PublishOutcome::Shared { .. })
    }

    /// Value stored under `SHARED_FLAG_KEY`
    pub fn flag(&self) -> &'static str {
        if self.is_shared() {
            "1"
        } else {
            "0"
        }
    }

    /// Value stored under `REMOTE_ID_KEY`; `None` means delete
    pub fn remote_post_id(&self) -> Option<&str> {
        match self {
            PublishOutcome::Shared { remote_post_id, .. } => Some(remote_post_id.0.as_str()),
            PublishOutcome::NotShared => None,
        }
    }

    /// Value stored under `SHARED_AT_KEY`; `None` means delete
    pub fn shared_at(&self) -> Option<String> {
        match self {
            PublishOutcome::Shared { shared_at, .. } => {
                Some(shared_at.format(SHARED_AT_FORMAT).to_string())
            }
            PublishOutcome::NotShared => None,
        }
    }
}
