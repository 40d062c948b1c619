//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::domain::entities::{
    Editor, PageCredentials, Post, PostId, PublishOutcome, RemoteObjectId, REMOTE_ID_KEY,
    SHARED_AT_KEY, SHARED_FLAG_KEY,
};
use crate::domain::ports::{
    DownloadedImage, EditorDirectory, GraphClient, GraphObject, MediaFetcher, PhotoUpload,
    PostStore,
};
use crate::error::{DomainError, GraphError};

// ============================================================================
// In-Memory Post Store
// ============================================================================

#[derive(Default)]
pub struct InMemoryPostStore {
    posts: RwLock<HashMap<PostId, Post>>,
    writes: RwLock<Vec<(PostId, PublishOutcome)>>,
    fail_writes: bool,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a post for testing
    pub fn with_post(self, post: Post) -> Self {
        self.posts.write().unwrap().insert(post.id, post);
        self
    }

    /// Make every `record_outcome` call fail
    pub fn with_failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn meta(&self, id: PostId, key: &str) -> Option<String> {
        self.posts
            .read()
            .unwrap()
            .get(&id)
            .and_then(|p| p.meta.get(key).cloned())
    }

    pub fn write_count(&self) -> usize {
        self.writes.read().unwrap().len()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, DomainError> {
        Ok(self.posts.read().unwrap().get(&id).cloned())
    }

    async fn record_outcome(
        &self,
        id: PostId,
        outcome: &PublishOutcome,
    ) -> Result<(), DomainError> {
        if self.fail_writes {
            return Err(DomainError::Host("write rejected".to_string()));
        }

        let mut posts = self.posts.write().unwrap();
        let post = posts
            .get_mut(&id)
            .ok_or_else(|| DomainError::NotFound(format!("Post {} not found", id)))?;

        post.meta
            .insert(SHARED_FLAG_KEY.to_string(), outcome.flag().to_string());
        match outcome.remote_post_id() {
            Some(remote_id) => {
                post.meta
                    .insert(REMOTE_ID_KEY.to_string(), remote_id.to_string());
            }
            None => {
                post.meta.remove(REMOTE_ID_KEY);
            }
        }
        match outcome.shared_at() {
            Some(shared_at) => {
                post.meta.insert(SHARED_AT_KEY.to_string(), shared_at);
            }
            None => {
                post.meta.remove(SHARED_AT_KEY);
            }
        }

        self.writes.write().unwrap().push((id, outcome.clone()));
        Ok(())
    }
}

// ============================================================================
// Mock Editor Directory
// ============================================================================

#[derive(Default)]
pub struct MockEditorDirectory {
    editors: HashMap<String, Editor>,
}

impl MockEditorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `authorization` as the credentials of `editor`
    pub fn with_editor(mut self, authorization: &str, editor: Editor) -> Self {
        self.editors.insert(authorization.to_string(), editor);
        self
    }
}

#[async_trait]
impl EditorDirectory for MockEditorDirectory {
    async fn resolve(&self, authorization: &str) -> Result<Option<Editor>, DomainError> {
        Ok(self.editors.get(authorization).cloned())
    }
}

// ============================================================================
// Mock Graph Client
// ============================================================================

/// Scripted Graph API reply
#[derive(Debug, Clone)]
pub enum MockReply {
    Created(String),
    ApiError {
        status: u16,
        message: Option<String>,
        body: String,
    },
    Timeout,
}

impl MockReply {
    pub fn created(id: &str) -> Self {
        MockReply::Created(id.to_string())
    }

    pub fn api_error(status: u16, message: Option<&str>, body: &str) -> Self {
        MockReply::ApiError {
            status,
            message: message.map(str::to_string),
            body: body.to_string(),
        }
    }

    fn to_result(&self) -> Result<GraphObject, GraphError> {
        match self {
            MockReply::Created(id) => Ok(GraphObject {
                id: RemoteObjectId(id.clone()),
            }),
            MockReply::ApiError {
                status,
                message,
                body,
            } => Err(GraphError::Api {
                status: *status,
                message: message.clone(),
                body: body.clone(),
            }),
            MockReply::Timeout => Err(GraphError::Timeout("operation timed out".to_string())),
        }
    }
}

/// Recorded Graph API call
#[derive(Debug, Clone)]
pub enum GraphCall {
    Photo {
        page_id: String,
        caption: String,
        mime_type: String,
        path: PathBuf,
        /// Whether the scratch file was on disk during the upload
        file_existed: bool,
    },
    Comment {
        object_id: String,
        message: String,
    },
    Feed {
        page_id: String,
        message: String,
        link: String,
    },
}

pub struct MockGraphClient {
    photo: RwLock<MockReply>,
    comment: RwLock<MockReply>,
    feed: RwLock<MockReply>,
    calls: RwLock<Vec<GraphCall>>,
}

impl Default for MockGraphClient {
    fn default() -> Self {
        let unexpected = MockReply::api_error(500, Some("unexpected call"), "{}");
        Self {
            photo: RwLock::new(unexpected.clone()),
            comment: RwLock::new(unexpected.clone()),
            feed: RwLock::new(unexpected),
            calls: RwLock::new(Vec::new()),
        }
    }
}

impl MockGraphClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_photo_reply(self, reply: MockReply) -> Self {
        *self.photo.write().unwrap() = reply;
        self
    }

    pub fn with_comment_reply(self, reply: MockReply) -> Self {
        *self.comment.write().unwrap() = reply;
        self
    }

    pub fn with_feed_reply(self, reply: MockReply) -> Self {
        self.set_feed_reply(reply);
        self
    }

    pub fn set_feed_reply(&self, reply: MockReply) {
        *self.feed.write().unwrap() = reply;
    }

    pub fn calls(&self) -> Vec<GraphCall> {
        self.calls.read().unwrap().clone()
    }

    fn record(&self, call: GraphCall) {
        self.calls.write().unwrap().push(call);
    }
}

#[async_trait]
impl GraphClient for MockGraphClient {
    async fn upload_photo(
        &self,
        page: &PageCredentials,
        caption: &str,
        photo: PhotoUpload<'_>,
    ) -> Result<GraphObject, GraphError> {
        self.record(GraphCall::Photo {
            page_id: page.page_id().to_string(),
            caption: caption.to_string(),
            mime_type: photo.mime_type.to_string(),
            path: photo.path.to_path_buf(),
            file_existed: photo.path.exists(),
        });
        self.photo.read().unwrap().to_result()
    }

    async fn add_comment(
        &self,
        _page: &PageCredentials,
        object_id: &RemoteObjectId,
        message: &str,
    ) -> Result<GraphObject, GraphError> {
        self.record(GraphCall::Comment {
            object_id: object_id.0.clone(),
            message: message.to_string(),
        });
        self.comment.read().unwrap().to_result()
    }

    async fn publish_feed(
        &self,
        page: &PageCredentials,
        message: &str,
        link: &str,
    ) -> Result<GraphObject, GraphError> {
        self.record(GraphCall::Feed {
            page_id: page.page_id().to_string(),
            message: message.to_string(),
            link: link.to_string(),
        });
        self.feed.read().unwrap().to_result()
    }
}

// ============================================================================
// Mock Media Fetcher
// ============================================================================

#[derive(Debug, Clone)]
pub enum MediaReply {
    Bytes(Vec<u8>),
    Status(u16),
    Timeout,
}

pub struct MockMediaFetcher {
    reply: MediaReply,
    downloads: RwLock<Vec<String>>,
}

impl Default for MockMediaFetcher {
    fn default() -> Self {
        Self {
            reply: MediaReply::Status(404),
            downloads: RwLock::new(Vec::new()),
        }
    }
}

impl MockMediaFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(mut self, reply: MediaReply) -> Self {
        self.reply = reply;
        self
    }

    pub fn download_count(&self) -> usize {
        self.downloads.read().unwrap().len()
    }
}

#[async_trait]
impl MediaFetcher for MockMediaFetcher {
    async fn download(&self, url: &str) -> Result<DownloadedImage, GraphError> {
        self.downloads.write().unwrap().push(url.to_string());
        match &self.reply {
            MediaReply::Bytes(bytes) => Ok(DownloadedImage {
                bytes: bytes.clone(),
            }),
            MediaReply::Status(status) => Err(GraphError::Api {
                status: *status,
                message: None,
                body: String::new(),
            }),
            MediaReply::Timeout => Err(GraphError::Timeout("image download".to_string())),
        }
    }
}
