//! WordPress REST API client implementation

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Client, StatusCode};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::entities::{
    Editor, EditorId, Post, PostId, PublishOutcome, REMOTE_ID_KEY, SHARED_AT_KEY, SHARED_FLAG_KEY,
};
use crate::domain::ports::{EditorDirectory, PostStore};
use crate::error::DomainError;

/// WordPress REST client authenticated with an application password
pub struct WordPressClient {
    http: Client,
    base_url: String,
    username: String,
    app_password: String,
}

impl WordPressClient {
    pub fn new(base_url: String, username: String, app_password: String) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            username,
            app_password,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/wp-json/wp/v2{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .get(self.api_url(path))
            .basic_auth(&self.username, Some(&self.app_password))
    }

    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, DomainError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| DomainError::Host(format!("Invalid response: {}", e)))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(DomainError::Host(format!("{} - {}", status.as_u16(), body)))
        }
    }

    async fn tag_names(&self, ids: &[i64]) -> Result<Vec<String>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let include = ids
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let response = self
            .get("/tags")
            .query(&[
                ("include", include.as_str()),
                ("orderby", "include"),
                ("per_page", "100"),
            ])
            .send()
            .await
            .map_err(host_error)?;

        let terms: Vec<WpTerm> = self.handle_response(response).await?;
        Ok(terms.into_iter().map(|t| decode_entities(&t.name)).collect())
    }

    /// Full-size URL of an attachment; a missing attachment is not an error
    async fn media_url(&self, media_id: i64) -> Result<Option<String>, DomainError> {
        if media_id <= 0 {
            return Ok(None);
        }

        let response = self
            .get(&format!("/media/{}", media_id))
            .send()
            .await
            .map_err(host_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::warn!(media_id, "Featured media not found");
            return Ok(None);
        }

        let media: WpMedia = self.handle_response(response).await?;
        Ok(Some(media.source_url).filter(|url| !url.is_empty()))
    }
}

/// Response types for the WordPress REST API
#[derive(Deserialize)]
struct WpPost {
    id: i64,
    title: WpText,
    content: WpText,
    link: String,
    #[serde(default, deserialize_with = "deserialize_meta")]
    meta: HashMap<String, String>,
    #[serde(default)]
    tags: Vec<i64>,
    #[serde(default)]
    featured_media: i64,
}

/// `raw` is only present with `context=edit`
#[derive(Deserialize)]
struct WpText {
    raw: Option<String>,
    #[serde(default)]
    rendered: String,
}

impl WpText {
    fn into_raw(self) -> String {
        self.raw.unwrap_or(self.rendered)
    }
}

#[derive(Deserialize)]
struct WpTerm {
    name: String,
}

#[derive(Deserialize)]
struct WpMedia {
    #[serde(default)]
    source_url: String,
}

#[derive(Deserialize)]
struct WpUser {
    id: i64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    capabilities: HashMap<String, serde_json::Value>,
}

/// Post as returned from a meta update; only the echoed meta is read
#[derive(Deserialize)]
struct WpMetaEcho {
    #[serde(default, deserialize_with = "deserialize_meta")]
    meta: HashMap<String, String>,
}

#[derive(Serialize)]
struct UpdateMetaRequest<'a> {
    meta: HashMap<&'a str, Option<String>>,
}

/// WordPress sends `[]` instead of `{}` when a post has no registered meta.
/// Scalar values are kept as strings; lists keep their first element.
fn deserialize_meta<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Object(entries) = value else {
        return Ok(HashMap::new());
    };

    Ok(entries
        .into_iter()
        .filter_map(|(key, value)| meta_string(value).map(|v| (key, v)))
        .collect())
}

fn meta_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(if b { "1" } else { "0" }.to_string()),
        serde_json::Value::Array(items) => items.into_iter().next().and_then(meta_string),
        _ => None,
    }
}

/// Term names come back HTML-escaped
fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&amp;", "&")
}

fn host_error(e: reqwest::Error) -> DomainError {
    DomainError::Host(e.to_string())
}

#[async_trait]
impl PostStore for WordPressClient {
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, DomainError> {
        let response = self
            .get(&format!("/posts/{}", id))
            .query(&[("context", "edit")])
            .send()
            .await
            .map_err(host_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let wp: WpPost = self.handle_response(response).await?;
        let tags = self.tag_names(&wp.tags).await?;
        let thumbnail_url = self.media_url(wp.featured_media).await?;

        Ok(Some(Post {
            id: PostId(wp.id),
            title: wp.title.into_raw(),
            content: wp.content.into_raw(),
            permalink: wp.link,
            thumbnail_url,
            tags,
            meta: wp.meta,
        }))
    }

    async fn record_outcome(
        &self,
        id: PostId,
        outcome: &PublishOutcome,
    ) -> Result<(), DomainError> {
        let meta = HashMap::from([
            (SHARED_FLAG_KEY, Some(outcome.flag().to_string())),
            (REMOTE_ID_KEY, outcome.remote_post_id().map(str::to_string)),
            (SHARED_AT_KEY, outcome.shared_at()),
        ]);

        let response = self
            .http
            .post(self.api_url(&format!("/posts/{}", id)))
            .basic_auth(&self.username, Some(&self.app_password))
            .json(&UpdateMetaRequest { meta })
            .send()
            .await
            .map_err(host_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(DomainError::NotFound(format!("post {}", id)));
        }

        // Unregistered meta keys are dropped silently with a 2xx, so check the echo
        let echo: WpMetaEcho = self.handle_response(response).await?;
        match echo.meta.get(SHARED_FLAG_KEY) {
            Some(flag) if flag == outcome.flag() => Ok(()),
            stored => Err(DomainError::Host(format!(
                "post {} meta {} is {:?} after update, expected {:?}; \
                 is it registered with show_in_rest?",
                id,
                SHARED_FLAG_KEY,
                stored,
                outcome.flag()
            ))),
        }
    }
}

#[async_trait]
impl EditorDirectory for WordPressClient {
    async fn resolve(&self, authorization: &str) -> Result<Option<Editor>, DomainError> {
        let response = self
            .http
            .get(self.api_url("/users/me"))
            .query(&[("context", "edit")])
            .header(AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(host_error)?;

        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            return Ok(None);
        }

        let user: WpUser = self.handle_response(response).await?;
        let capabilities: BTreeSet<String> = user
            .capabilities
            .into_iter()
            .filter(|(_, granted)| granted.as_bool() == Some(true))
            .map(|(name, _)| name)
            .collect();

        Ok(Some(Editor {
            id: EditorId(user.id),
            name: user.name,
            capabilities,
        }))
    }
}
