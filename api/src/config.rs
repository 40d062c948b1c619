use std::env;

use crate::app::ImageFailurePolicy;
use crate::domain::entities::PageCredentials;

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    /// Base URL of the WordPress site (without `/wp-json`)
    pub wp_base_url: String,
    /// Service account used for post reads and outcome writes
    pub wp_username: String,
    pub wp_app_password: String,
    pub fb_page_id: String,
    pub fb_page_token: String,
    pub graph_api_url: String,
    /// Optional Graph API version segment, e.g. `v19.0`
    pub graph_api_version: Option<String>,
    /// HMAC key for anti-forgery tokens
    pub nonce_secret: String,
    pub image_failure_policy: ImageFailurePolicy,
    /// Prefix for links to published posts in the status column
    pub facebook_post_base_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let image_failure_policy = env::var("IMAGE_FAILURE_POLICY")
            .ok()
            .and_then(|raw| {
                raw.parse::<ImageFailurePolicy>()
                    .map_err(|e| tracing::warn!("{}, using fallback", e))
                    .ok()
            })
            .unwrap_or_default();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            wp_base_url: env::var("WP_BASE_URL").unwrap_or_else(|_| "http://localhost".to_string()),
            wp_username: env::var("WP_USERNAME").unwrap_or_default(),
            wp_app_password: env::var("WP_APP_PASSWORD").unwrap_or_default(),
            fb_page_id: env::var("FB_PAGE_ID").unwrap_or_default(),
            fb_page_token: env::var("FB_PAGE_TOKEN").unwrap_or_default(),
            graph_api_url: env::var("GRAPH_API_URL")
                .unwrap_or_else(|_| "https://graph.facebook.com".to_string()),
            graph_api_version: env::var("GRAPH_API_VERSION")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            nonce_secret: env::var("NONCE_SECRET").expect("NONCE_SECRET must be set"),
            image_failure_policy,
            facebook_post_base_url: env::var("FACEBOOK_POST_BASE_URL")
                .unwrap_or_else(|_| "https://www.facebook.com/".to_string()),
        }
    }

    /// Page credentials, or `None` while either setting is blank
    pub fn page_credentials(&self) -> Option<PageCredentials> {
        PageCredentials::new(&self.fb_page_id, &self.fb_page_token)
    }

    /// Check if the Facebook Page is configured
    pub fn facebook_configured(&self) -> bool {
        self.page_credentials().is_some()
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        port: 8080,
        wp_base_url: "http://localhost".to_string(),
        wp_username: "publisher".to_string(),
        wp_app_password: "abcd efgh".to_string(),
        fb_page_id: "1234567890".to_string(),
        fb_page_token: "EAAB-test-page-token".to_string(),
        graph_api_url: "https://graph.facebook.com".to_string(),
        graph_api_version: None,
        nonce_secret: "test-nonce-secret".to_string(),
        image_failure_policy: ImageFailurePolicy::default(),
        facebook_post_base_url: "https://www.facebook.com/".to_string(),
    }
}
