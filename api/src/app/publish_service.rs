//! Publish service
//!
//! Orchestrates one publish attempt: precondition checks, content resolution,
//! the photo or link strategy against the Graph API, and persistence of the
//! outcome on the post.

use std::sync::Arc;

use chrono::Utc;

use crate::app::metadata_resolver;
use crate::app::nonce_service::{NonceService, PUBLISH_ACTION};
use crate::app::scratch_image::ScratchImage;
use crate::domain::entities::{
    Editor, PageCredentials, PostId, PublishOutcome, PublishRequest, PublishStrategy,
    RemoteObjectId, EDIT_POSTS,
};
use crate::domain::ports::{GraphClient, MediaFetcher, PostStore};
use crate::error::{GraphError, PublishError};

/// What to do when the photo path fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFailurePolicy {
    /// Publish a link post instead and report the photo failure as a warning
    #[default]
    FallbackToLink,
    /// Record a failed attempt
    Fail,
}

impl std::str::FromStr for ImageFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fallback" | "fallback_to_link" | "link" => Ok(ImageFailurePolicy::FallbackToLink),
            "fail" => Ok(ImageFailurePolicy::Fail),
            _ => Err(format!("Unknown image failure policy: {}", s)),
        }
    }
}

/// Raw trigger input, validated by `PublishService::publish`
#[derive(Debug, Clone, Copy, Default)]
pub struct PublishCommand<'a> {
    pub nonce: Option<&'a str>,
    pub post_id: Option<&'a str>,
}

/// Successful attempt
#[derive(Debug, Clone)]
pub struct PublishReport {
    pub post_id: PostId,
    pub remote_id: RemoteObjectId,
    pub strategy: PublishStrategy,
    /// Advisory notes; the post was published regardless
    pub warnings: Vec<String>,
}

impl PublishReport {
    pub fn headline(&self) -> String {
        match self.strategy {
            PublishStrategy::Photo => {
                format!("Photo posted successfully! Post ID: {}", self.remote_id)
            }
            PublishStrategy::Link => {
                format!("Link posted successfully! Post ID: {}", self.remote_id)
            }
            PublishStrategy::LinkFallback => {
                format!("Image failed, link posted instead. Post ID: {}", self.remote_id)
            }
        }
    }
}

impl std::fmt::Display for PublishReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.headline())?;
        for warning in &self.warnings {
            write!(f, "\nNote: {}", warning)?;
        }
        Ok(())
    }
}

struct Published {
    remote_id: RemoteObjectId,
    strategy: PublishStrategy,
    warnings: Vec<String>,
}

/// Service for publishing posts to a Facebook Page
pub struct PublishService<PS, GC, MF>
where
    PS: PostStore + ?Sized,
    GC: GraphClient + ?Sized,
    MF: MediaFetcher + ?Sized,
{
    posts: Arc<PS>,
    graph: Arc<GC>,
    media: Arc<MF>,
    nonces: Arc<NonceService>,
    image_policy: ImageFailurePolicy,
}

impl<PS, GC, MF> PublishService<PS, GC, MF>
where
    PS: PostStore + ?Sized,
    GC: GraphClient + ?Sized,
    MF: MediaFetcher + ?Sized,
{
    pub fn new(
        posts: Arc<PS>,
        graph: Arc<GC>,
        media: Arc<MF>,
        nonces: Arc<NonceService>,
        image_policy: ImageFailurePolicy,
    ) -> Self {
        Self {
            posts,
            graph,
            media,
            nonces,
            image_policy,
        }
    }

    /// Publish a post to the page configured by `credentials`.
    ///
    /// Preconditions are checked in order (permission, token, post id,
    /// credentials, post lookup) and fail without writing anything. Once they
    /// pass, exactly one outcome is recorded on the post, success or failure.
    pub async fn publish(
        &self,
        caller: Option<&Editor>,
        command: PublishCommand<'_>,
        credentials: Option<&PageCredentials>,
    ) -> Result<PublishReport, PublishError> {
        let editor = caller
            .filter(|e| e.can(EDIT_POSTS))
            .ok_or(PublishError::PermissionDenied)?;

        let nonce = command.nonce.unwrap_or_default();
        if !self.nonces.verify(nonce, PUBLISH_ACTION, editor.id) {
            tracing::warn!(editor_id = %editor.id, "Rejected publish with invalid nonce");
            return Err(PublishError::InvalidRequest(
                "Invalid or expired security token".to_string(),
            ));
        }

        let post_id = command
            .post_id
            .and_then(PostId::parse)
            .ok_or_else(|| PublishError::InvalidRequest("Invalid post ID".to_string()))?;

        let credentials = credentials.ok_or(PublishError::NotConfigured)?;

        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or(PublishError::NotFound)?;

        let request = metadata_resolver::resolve(&post);
        tracing::debug!(
            post_id = %post_id,
            has_image = request.image_url.is_some(),
            "Resolved publish request"
        );

        let result = self.attempt(credentials, &request).await;

        let outcome = match &result {
            Ok(published) => PublishOutcome::Shared {
                remote_post_id: published.remote_id.clone(),
                shared_at: Utc::now(),
            },
            Err(_) => PublishOutcome::NotShared,
        };

        if let Err(e) = self.posts.record_outcome(post_id, &outcome).await {
            tracing::error!(
                post_id = %post_id,
                remote_id = ?outcome.remote_post_id(),
                error = %e,
                "Failed to record publish outcome"
            );
            return Err(match outcome.remote_post_id() {
                Some(remote_id) => PublishError::NotRecorded {
                    remote_id: remote_id.to_string(),
                    source: e,
                },
                None => PublishError::Host(e),
            });
        }

        match result {
            Ok(published) => {
                tracing::info!(
                    post_id = %post_id,
                    strategy = %published.strategy,
                    remote_id = %published.remote_id,
                    warnings = published.warnings.len(),
                    "Published post to Facebook"
                );
                Ok(PublishReport {
                    post_id,
                    remote_id: published.remote_id,
                    strategy: published.strategy,
                    warnings: published.warnings,
                })
            }
            Err(e) => {
                tracing::warn!(post_id = %post_id, error = %e, "Publish attempt failed");
                Err(e)
            }
        }
    }

    async fn attempt(
        &self,
        credentials: &PageCredentials,
        request: &PublishRequest,
    ) -> Result<Published, PublishError> {
        let Some(image_url) = request.image_url.as_deref() else {
            let remote_id = self.publish_link(credentials, request).await?;
            return Ok(Published {
                remote_id,
                strategy: PublishStrategy::Link,
                warnings: Vec::new(),
            });
        };

        match self.publish_photo(credentials, request, image_url).await {
            Ok(published) => Ok(published),
            Err(e) if self.image_policy == ImageFailurePolicy::FallbackToLink => {
                tracing::warn!(error = %e, "Photo upload failed, falling back to link post");
                let remote_id = self.publish_link(credentials, request).await?;
                Ok(Published {
                    remote_id,
                    strategy: PublishStrategy::LinkFallback,
                    warnings: vec![format!("Photo upload failed: {}", e)],
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn publish_photo(
        &self,
        credentials: &PageCredentials,
        request: &PublishRequest,
        image_url: &str,
    ) -> Result<Published, PublishError> {
        let image = self
            .media
            .download(image_url)
            .await
            .map_err(download_failure)?;

        if image.bytes.is_empty() {
            return Err(PublishError::NoImageAvailable(format!(
                "{} returned no data",
                image_url
            )));
        }

        let scratch = ScratchImage::stage(&image.bytes).map_err(|e| {
            PublishError::NoImageAvailable(format!("could not stage image: {}", e))
        })?;
        tracing::debug!(
            path = %scratch.path().display(),
            mime_type = scratch.mime_type(),
            size = image.bytes.len(),
            "Staged image for upload"
        );

        let uploaded = self
            .graph
            .upload_photo(credentials, &request.message, scratch.as_upload())
            .await;
        scratch.release();

        let photo = uploaded.map_err(upload_failure)?;

        let mut warnings = Vec::new();
        if let Err(e) = self
            .graph
            .add_comment(credentials, &photo.id, &request.link)
            .await
        {
            tracing::warn!(remote_id = %photo.id, error = %e, "Failed to attach link comment");
            warnings.push(format!(
                "Link comment could not be added: {}",
                e.upstream_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| e.to_string())
            ));
        }

        Ok(Published {
            remote_id: photo.id,
            strategy: PublishStrategy::Photo,
            warnings,
        })
    }

    async fn publish_link(
        &self,
        credentials: &PageCredentials,
        request: &PublishRequest,
    ) -> Result<RemoteObjectId, PublishError> {
        self.graph
            .publish_feed(credentials, &request.message, &request.link)
            .await
            .map(|object| object.id)
            .map_err(|e| match e {
                GraphError::Api { message, body, .. } => {
                    PublishError::UpstreamApi(message.unwrap_or(body))
                }
                other => PublishError::UpstreamTransport(format!("Failed to post link: {}", other)),
            })
    }
}

fn download_failure(e: GraphError) -> PublishError {
    match e {
        GraphError::Api { status, .. } => {
            PublishError::NoImageAvailable(format!("image download returned HTTP {}", status))
        }
        GraphError::TooLarge { limit } => {
            PublishError::NoImageAvailable(format!("image is larger than {} bytes", limit))
        }
        other => PublishError::UpstreamTransport(format!("Failed to download image: {}", other)),
    }
}

fn upload_failure(e: GraphError) -> PublishError {
    match e {
        GraphError::Api { message, .. } => PublishError::UpstreamApi(
            message.unwrap_or_else(|| "Failed to upload photo to Facebook.".to_string()),
        ),
        GraphError::Io(e) => {
            PublishError::NoImageAvailable(format!("could not read staged image: {}", e))
        }
        other => PublishError::UpstreamTransport(format!("Failed to upload photo: {}", other)),
    }
}
