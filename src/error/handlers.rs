//! Error handlers
//!
//! Maps errors onto HTTP-equivalent status codes and client-facing text.

use crate::error::types::{AppError, GatewayError};
use log::error;

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_TOO_MANY_REQUESTS: u16 = 429;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// Log an application error
pub fn handle_error(err: &AppError) {
    error!("Copilot core error: {}", err);
}

/// Convert a gateway error to a status code
pub fn error_to_status_code(err: &GatewayError) -> u16 {
    match err {
        GatewayError::RateLimited(_) => STATUS_TOO_MANY_REQUESTS,
        GatewayError::EmptyMessage => STATUS_BAD_REQUEST,
        GatewayError::MalformedRequest(_) => STATUS_BAD_REQUEST,
        GatewayError::Limiter(_) => STATUS_INTERNAL_ERROR,
    }
}

/// Short error label and user-facing message for a gateway error
pub fn error_to_message(err: &GatewayError) -> (String, String) {
    match err {
        GatewayError::RateLimited(_) => (
            "Rate limit exceeded".to_string(),
            "Demo is rate-limited. Try again in a moment.".to_string(),
        ),
        GatewayError::Limiter(_) => (
            "Chat failed".to_string(),
            "The server is misconfigured.".to_string(),
        ),
        other => (other.to_string(), other.to_string()),
    }
}
