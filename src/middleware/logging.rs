//! Logging middleware
//!
//! Provides request logging functionality.

use log::{info, warn};

use crate::rate_limit::LimitWindow;

/// Log a client connection
pub fn log_connection(peer_addr: &str) {
    info!("Client connected: {}", peer_addr);
}

/// Log an admitted chat request
pub fn log_admission(client_id: &str, evidence_docs: usize) {
    info!(
        "Admitted request from {} ({} evidence documents)",
        client_id, evidence_docs
    );
}

/// Log a rate-limited chat request
pub fn log_rejection(client_id: &str, window: LimitWindow) {
    warn!("Rate limited {}: per-{} limit reached", client_id, window);
}
