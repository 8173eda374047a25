//! Error handling
//!
//! Defines error types and handling for the copilot core.

pub mod handlers;
pub mod types;

pub use types::*;
