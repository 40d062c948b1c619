//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod ajax;
pub mod nonce;
pub mod settings;
pub mod share_status;

pub use ajax::ajax;
pub use nonce::issue_nonce;
pub use settings::settings_status;
pub use share_status::share_status;
