//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod graph;
pub mod wordpress;

pub use graph::{GraphClientImpl, HttpMediaFetcher};
pub use wordpress::WordPressClient;
