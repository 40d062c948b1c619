//! Caller authentication

pub mod editor;

pub use editor::optional_editor_middleware;
