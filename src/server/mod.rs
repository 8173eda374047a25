//! Server front end
//!
//! Accepts connections and feeds newline-delimited JSON chat requests
//! through the gateway.

pub mod core;

pub use core::{Server, respond};
