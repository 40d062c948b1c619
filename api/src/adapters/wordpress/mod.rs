//! WordPress adapter
//!
//! Host platform ports backed by the WordPress REST API.

pub mod client;

pub use client::WordPressClient;
