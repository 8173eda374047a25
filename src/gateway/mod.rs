//! Chat gateway
//!
//! The request handler composing rate limiting and retrieval.

pub mod handler;
pub mod request;
pub mod results;

pub use handler::ChatGateway;
pub use request::{ChatRequest, parse_request};
pub use results::{ChatContext, build_context_block};
