//! Editor domain entity
//!
//! The authenticated host user behind a trigger request.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Capability required to publish a post
pub const EDIT_POSTS: &str = "edit_posts";

/// Host-side identifier of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EditorId(pub i64);

impl std::fmt::Display for EditorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Editor {
    pub id: EditorId,
    pub name: String,
    /// Capabilities granted by the host
    pub capabilities: BTreeSet<String>,
}

impl Editor {
    pub fn can(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }
}
