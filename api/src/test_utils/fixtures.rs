//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use std::collections::{BTreeSet, HashMap};

use crate::domain::entities::{
    Editor, EditorId, PageCredentials, Post, PostId, EDIT_POSTS, OG_DESCRIPTION_KEY,
    OG_IMAGE_KEY, OG_TITLE_KEY,
};

/// 1x1 transparent PNG
pub const TEST_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

/// Create a test post with a featured image and tags, no SEO metadata
pub fn test_post() -> Post {
    Post {
        id: PostId(1),
        title: "Shipping Rust to Production".to_string(),
        content: "<p>We moved our <strong>publishing pipeline</strong> to Rust.</p>".to_string(),
        permalink: "https://blog.example.com/shipping-rust".to_string(),
        thumbnail_url: Some("https://blog.example.com/uploads/rust.png".to_string()),
        tags: vec!["Rust".to_string(), "C++ Rocks!".to_string(), "---".to_string()],
        meta: HashMap::new(),
    }
}

/// Create a test post carrying open-graph metadata
pub fn test_post_with_seo(title: &str, description: &str, image: &str) -> Post {
    let mut meta = HashMap::new();
    meta.insert(OG_TITLE_KEY.to_string(), title.to_string());
    meta.insert(OG_DESCRIPTION_KEY.to_string(), description.to_string());
    meta.insert(OG_IMAGE_KEY.to_string(), image.to_string());

    Post {
        meta,
        thumbnail_url: None,
        tags: Vec::new(),
        ..test_post()
    }
}

/// Create an editor allowed to publish
pub fn test_editor() -> Editor {
    Editor {
        id: EditorId(7),
        name: "editor".to_string(),
        capabilities: BTreeSet::from([EDIT_POSTS.to_string(), "read".to_string()]),
    }
}

/// Create a user without `edit_posts`
pub fn test_viewer() -> Editor {
    Editor {
        id: EditorId(8),
        name: "subscriber".to_string(),
        capabilities: BTreeSet::from(["read".to_string()]),
    }
}

/// Page credentials used across tests
pub fn test_credentials() -> PageCredentials {
    PageCredentials::new("1234567890", "EAAB-test-page-token").expect("valid test credentials")
}
