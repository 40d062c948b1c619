//! Post domain entity
//!
//! A post is owned by the host platform. The publisher only reads it and
//! annotates it with the outcome of a publish attempt.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Open-graph title written by the SEO add-on
pub const OG_TITLE_KEY: &str = "_yoast_wpseo_opengraph-title";
/// Open-graph description written by the SEO add-on
pub const OG_DESCRIPTION_KEY: &str = "_yoast_wpseo_opengraph-description";
/// Open-graph image URL written by the SEO add-on
pub const OG_IMAGE_KEY: &str = "_yoast_wpseo_opengraph-image";

/// Host-side identifier of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostId(pub i64);

impl PostId {
    /// Parse a raw identifier, accepting only positive integers
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().parse::<i64>() {
            Ok(id) if id > 0 => Some(Self(id)),
            _ => None,
        }
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Post as seen by the publisher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    /// Raw body, may contain markup
    pub content: String,
    pub permalink: String,
    /// Full-size URL of the featured image, if the post has one
    pub thumbnail_url: Option<String>,
    /// Tag names in host order
    pub tags: Vec<String>,
    pub meta: HashMap<String, String>,
}

impl Post {
    /// Metadata value for `key`, treating empty strings as absent
    pub fn meta_value(&self, key: &str) -> Option<&str> {
        self.meta
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}
