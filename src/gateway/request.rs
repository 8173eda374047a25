//! Chat request parsing

use serde::Deserialize;

use crate::error::GatewayError;
use crate::rate_limit::Headers;

/// An inbound chat request as seen by the gateway.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub headers: Headers,
    #[serde(default)]
    pub message: Option<String>,
}

impl ChatRequest {
    pub fn new(headers: Headers, message: impl Into<String>) -> Self {
        Self {
            headers,
            message: Some(message.into()),
        }
    }

    /// Trimmed message text, empty when absent.
    pub fn trimmed_message(&self) -> &str {
        self.message.as_deref().map(str::trim).unwrap_or("")
    }
}

/// Parse one request line
pub fn parse_request(line: &str) -> Result<ChatRequest, GatewayError> {
    serde_json::from_str(line.trim()).map_err(|e| GatewayError::MalformedRequest(e.to_string()))
}
