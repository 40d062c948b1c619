//! Graph API adapter
//!
//! Facebook Graph API client and the downloader for post images.

pub mod client;
pub mod media;

pub use client::GraphClientImpl;
pub use media::HttpMediaFetcher;
