pub mod config;
pub mod error;
pub mod gateway;
pub mod middleware;
pub mod rate_limit;
pub mod retrieval;
pub mod server;

pub use crate::config::AppConfig;
pub use gateway::{ChatContext, ChatGateway, ChatRequest};
pub use rate_limit::{LimitWindow, RateLimitResult, RateLimiter, get_client_identifier};
pub use retrieval::{Document, build_corpus, retrieve};
pub use server::Server;
