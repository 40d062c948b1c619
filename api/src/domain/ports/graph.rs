//! Graph API port traits
//!
//! Defines the interface for publishing to a Facebook Page and for
//! downloading the image that accompanies a photo post.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{PageCredentials, RemoteObjectId};
use crate::error::GraphError;

/// Object created by a Graph API call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphObject {
    pub id: RemoteObjectId,
}

/// Image staged on disk for a multipart upload
#[derive(Debug, Clone, Copy)]
pub struct PhotoUpload<'a> {
    pub path: &'a Path,
    pub file_name: &'a str,
    pub mime_type: &'a str,
}

/// Raw image bytes fetched from a URL
#[derive(Debug, Clone)]
pub struct DownloadedImage {
    pub bytes: Vec<u8>,
}

/// Port trait for Graph API publishing
#[async_trait]
pub trait GraphClient: Send + Sync {
    /// Upload a photo to `{page_id}/photos` with `caption`
    async fn upload_photo(
        &self,
        page: &PageCredentials,
        caption: &str,
        photo: PhotoUpload<'_>,
    ) -> Result<GraphObject, GraphError>;

    /// Comment on an existing object via `{object_id}/comments`
    async fn add_comment(
        &self,
        page: &PageCredentials,
        object_id: &RemoteObjectId,
        message: &str,
    ) -> Result<GraphObject, GraphError>;

    /// Publish `message` with `link` to `{page_id}/feed`
    async fn publish_feed(
        &self,
        page: &PageCredentials,
        message: &str,
        link: &str,
    ) -> Result<GraphObject, GraphError>;
}

/// Port trait for downloading images referenced by posts
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    async fn download(&self, url: &str) -> Result<DownloadedImage, GraphError>;
}
