//! Error types
//!
//! Defines domain-specific error types for each module of the copilot core.

use std::fmt;
use std::io;

use crate::rate_limit::LimitWindow;

/// Rate limiter errors
///
/// Only raised for limits that could never be satisfied. Ordinary
/// rejections are reported through `RateLimitResult`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitError {
    InvalidLimit { window: LimitWindow, value: u32 },
}

impl fmt::Display for RateLimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateLimitError::InvalidLimit { window, value } => {
                write!(f, "Invalid per-{} limit: {} (must be at least 1)", window, value)
            }
        }
    }
}

impl std::error::Error for RateLimitError {}

/// Chat gateway errors
#[derive(Debug)]
pub enum GatewayError {
    RateLimited(LimitWindow),
    EmptyMessage,
    MalformedRequest(String),
    Limiter(RateLimitError),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::RateLimited(window) => {
                write!(f, "Rate limit exceeded (per-{} window)", window)
            }
            GatewayError::EmptyMessage => write!(f, "message is required"),
            GatewayError::MalformedRequest(reason) => write!(f, "Malformed request: {}", reason),
            GatewayError::Limiter(e) => write!(f, "Rate limiter misconfigured: {}", e),
        }
    }
}

impl std::error::Error for GatewayError {}

impl From<RateLimitError> for GatewayError {
    fn from(error: RateLimitError) -> Self {
        GatewayError::Limiter(error)
    }
}

/// General application error that encompasses all error types
#[derive(Debug)]
pub enum AppError {
    Config(config::ConfigError),
    Io(io::Error),
    Json(serde_json::Error),
    Gateway(GatewayError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "Configuration error: {}", e),
            AppError::Io(e) => write!(f, "I/O error: {}", e),
            AppError::Json(e) => write!(f, "JSON error: {}", e),
            AppError::Gateway(e) => write!(f, "Gateway error: {}", e),
        }
    }
}

impl std::error::Error for AppError {}

impl From<config::ConfigError> for AppError {
    fn from(error: config::ConfigError) -> Self {
        AppError::Config(error)
    }
}

impl From<io::Error> for AppError {
    fn from(error: io::Error) -> Self {
        AppError::Io(error)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        AppError::Json(error)
    }
}

impl From<GatewayError> for AppError {
    fn from(error: GatewayError) -> Self {
        AppError::Gateway(error)
    }
}
