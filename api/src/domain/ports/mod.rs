//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod graph;
pub mod host;

pub use graph::{DownloadedImage, GraphClient, GraphObject, MediaFetcher, PhotoUpload};
pub use host::{EditorDirectory, PostStore};
