//! Presentation helpers for host-side list screens

pub mod status_column;

pub use status_column::status_cell;
