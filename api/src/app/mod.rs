//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and external systems.

pub mod metadata_resolver;
pub mod nonce_service;
pub mod publish_service;
pub mod scratch_image;

pub use nonce_service::{NonceService, PUBLISH_ACTION};
pub use publish_service::{ImageFailurePolicy, PublishCommand, PublishService};
