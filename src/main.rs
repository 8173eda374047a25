//! Studio Copilot gateway - Entry Point
//!
//! Rate-limits chat requests and retrieves session evidence for them.

use log::{error, info, warn};
use std::sync::Arc;

use studio_copilot_core::config::AppConfig;
use studio_copilot_core::error::AppError;
use studio_copilot_core::error::handlers::handle_error;
use studio_copilot_core::gateway::ChatGateway;
use studio_copilot_core::rate_limit::RateLimiter;
use studio_copilot_core::retrieval::{CorpusStore, load_sessions};
use studio_copilot_core::server::Server;

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    info!("Launching copilot gateway...");

    if let Err(e) = run().await {
        handle_error(&e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let config = AppConfig::load()?;

    let sessions_path = config.corpus.sessions_path();
    let corpus = if sessions_path.exists() {
        let sessions = load_sessions(&sessions_path)?;
        CorpusStore::from_records(&sessions)
    } else {
        warn!(
            "Session file {} not found, serving an empty corpus",
            sessions_path.display()
        );
        CorpusStore::default()
    };
    info!("Corpus holds {} documents", corpus.len());

    let gateway = ChatGateway::new(
        Arc::new(RateLimiter::new()),
        Arc::new(corpus),
        config.rate_limit.clone(),
    );

    let server = Server::bind(config, gateway).await.map_err(|e| {
        error!("Server startup failed: {}", e);
        AppError::from(e)
    })?;
    server.start().await;
    Ok(())
}
