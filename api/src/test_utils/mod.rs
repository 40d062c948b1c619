//! Test utilities
//!
//! In-memory port implementations and fixtures. The Graph API and media
//! doubles replay scripted replies and record every call they receive.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
