//! Host platform port traits
//!
//! The host platform owns posts, their metadata and the users allowed to
//! touch them. Adapters provide concrete implementations (e.g. WordPress REST).

use async_trait::async_trait;

use crate::domain::entities::{Editor, Post, PostId, PublishOutcome};
use crate::error::DomainError;

/// Read access to posts plus the one write the publisher performs
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Find a post by ID, including its tags, featured image and metadata
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, DomainError>;

    /// Replace the stored publish outcome of a post.
    ///
    /// All three outcome fields must be written together or not at all.
    async fn record_outcome(&self, id: PostId, outcome: &PublishOutcome)
        -> Result<(), DomainError>;
}

/// Resolves caller credentials to a host user
#[async_trait]
pub trait EditorDirectory: Send + Sync {
    /// Resolve the raw `Authorization` header value of a request.
    ///
    /// Returns `Ok(None)` when the host rejects the credentials.
    async fn resolve(&self, authorization: &str) -> Result<Option<Editor>, DomainError>;
}
