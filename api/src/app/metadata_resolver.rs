//! Metadata resolver
//!
//! Turns a post and its SEO metadata into the content of a publish request.
//! Missing SEO fields fall back to the post's own fields; resolution never fails.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::entities::{
    Post, PublishRequest, OG_DESCRIPTION_KEY, OG_IMAGE_KEY, OG_TITLE_KEY,
};

/// Words kept when the description falls back to the post body
pub const EXCERPT_WORDS: usize = 30;
/// Marker appended to a truncated excerpt
pub const EXCERPT_MORE: &str = "...";
/// Tags considered for hashtags
pub const MAX_HASHTAGS: usize = 10;

static SCRIPT_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:script|style)[^>]*?>.*?</(?:script|style)\s*>").expect("valid regex")
});
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));

/// Build the publish request for a post
pub fn resolve(post: &Post) -> PublishRequest {
    let title = post
        .meta_value(OG_TITLE_KEY)
        .map(str::to_string)
        .unwrap_or_else(|| post.title.clone());

    let description = post
        .meta_value(OG_DESCRIPTION_KEY)
        .map(str::to_string)
        .unwrap_or_else(|| trim_words(&strip_tags(&post.content), EXCERPT_WORDS, EXCERPT_MORE));

    let image_url = post
        .meta_value(OG_IMAGE_KEY)
        .map(str::to_string)
        .or_else(|| post.thumbnail_url.clone().filter(|u| !u.trim().is_empty()));

    let hashtags = hashtag_line(&post.tags);

    PublishRequest {
        message: assemble_message(&title, &description, hashtags.as_deref()),
        link: post.permalink.clone(),
        image_url,
    }
}

/// `title`, blank line, `description`, then the hashtag paragraph if any
pub fn assemble_message(title: &str, description: &str, hashtags: Option<&str>) -> String {
    let mut message = format!("{}\n\n{}", title, description).trim().to_string();
    if let Some(hashtags) = hashtags {
        message.push_str("\n\n");
        message.push_str(hashtags);
    }
    message
}

/// Render up to `MAX_HASHTAGS` tags as `#Tag #Other`.
///
/// Every character that is not an ASCII letter or digit is removed; tags left
/// empty are dropped. Returns `None` when nothing survives.
pub fn hashtag_line(tags: &[String]) -> Option<String> {
    let hashtags: Vec<String> = tags
        .iter()
        .take(MAX_HASHTAGS)
        .map(|tag| {
            tag.chars()
                .filter(char::is_ascii_alphanumeric)
                .collect::<String>()
        })
        .filter(|tag| !tag.is_empty())
        .map(|tag| format!("#{}", tag))
        .collect();

    if hashtags.is_empty() {
        None
    } else {
        Some(hashtags.join(" "))
    }
}

/// Remove markup, dropping script and style blocks together with their content
pub fn strip_tags(html: &str) -> String {
    let without_blocks = SCRIPT_STYLE_RE.replace_all(html, "");
    TAG_RE.replace_all(&without_blocks, "").trim().to_string()
}

/// Keep the first `limit` words, joined by single spaces.
///
/// `more` is appended only when words were dropped.
pub fn trim_words(text: &str, limit: usize, more: &str) -> String {
    let words: Vec<&str> = text
        .split(|c| matches!(c, ' ' | '\n' | '\r' | '\t'))
        .filter(|w| !w.is_empty())
        .collect();

    if words.len() > limit {
        format!("{}{}", words[..limit].join(" "), more)
    } else {
        words.join(" ")
    }
}
