//! Rate limiting
//!
//! Per-client minute and hour sliding windows, checked before any
//! expensive work on a request.

pub mod client_id;
pub mod limiter;
pub mod results;
pub mod window;

pub use client_id::{Headers, UNKNOWN_CLIENT, get_client_identifier};
pub use limiter::RateLimiter;
pub use results::{LimitWindow, RateLimitResult};
