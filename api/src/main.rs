//! One-click Facebook publisher API
//!
//! Publishes WordPress posts to a Facebook Page on an editor's request, as a
//! photo with the link in a comment or as a link post, and records the
//! outcome on the post. Uses hexagonal (ports & adapters) architecture.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod error;
mod handlers;
mod render;

#[cfg(test)]
mod test_utils;


use adapters::{GraphClientImpl, HttpMediaFetcher, WordPressClient};
use app::{NonceService, PublishService};
use config::Config;
use domain::ports::{EditorDirectory, GraphClient, MediaFetcher, PostStore};

/// Publish service wired against trait objects so tests can swap adapters
pub type Publisher = PublishService<dyn PostStore, dyn GraphClient, dyn MediaFetcher>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub publish_service: Arc<Publisher>,
    pub posts: Arc<dyn PostStore>,
    pub editors: Arc<dyn EditorDirectory>,
    pub nonces: Arc<NonceService>,
    pub config: Config,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Trigger routes, kept separate so the server can rate limit them
pub fn ajax_routes() -> Router<AppState> {
    Router::new().route("/ajax", post(handlers::ajax))
}

pub fn build_router(state: AppState, ajax_routes: Router<AppState>) -> Router {
    // Editor routes (optional auth, handlers check the caller)
    let editor_routes = Router::new()
        .route("/nonce", get(handlers::issue_nonce))
        .route("/posts/:id/share-status", get(handlers::share_status))
        .merge(ajax_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::optional_editor_middleware,
        ));

    Router::new()
        // Health check (no auth)
        .route("/health", get(health))
        .route("/settings/status", get(handlers::settings_status))
        .merge(editor_routes)
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,fb_oneclick_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting one-click publisher API...");

    // Load configuration
    let config = Config::from_env();
    if !config.facebook_configured() {
        tracing::warn!("Facebook Page ID or token not set, publish requests will be rejected");
    }

    // Create adapters
    let wordpress = Arc::new(WordPressClient::new(
        config.wp_base_url.clone(),
        config.wp_username.clone(),
        config.wp_app_password.clone(),
    ));
    let posts: Arc<dyn PostStore> = wordpress.clone();
    let editors: Arc<dyn EditorDirectory> = wordpress;

    let graph: Arc<dyn GraphClient> = Arc::new(GraphClientImpl::new(
        config.graph_api_url.clone(),
        config.graph_api_version.clone(),
    ));
    let media: Arc<dyn MediaFetcher> = Arc::new(HttpMediaFetcher::new());

    // Create application services
    let nonces = Arc::new(NonceService::new(&config.nonce_secret)?);

    let publish_service = Arc::new(PublishService::new(
        posts.clone(),
        graph,
        media,
        nonces.clone(),
        config.image_failure_policy,
    ));

    let state = AppState {
        publish_service,
        posts,
        editors,
        nonces,
        config: config.clone(),
    };

    // Rate limiting config: 2 req/sec sustained, burst of 5
    // Uses PeerIpKeyExtractor to get client IP from socket connection
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(2)
            .burst_size(5)
            .finish()
            .context("Failed to build governor config")?,
    );

    let app = build_router(
        state,
        ajax_routes().layer(GovernorLayer {
            config: governor_config,
        }),
    );

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
