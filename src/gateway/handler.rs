//! Chat gateway
//!
//! Runs the cheap admission check, then retrieval, for every chat request.

use std::sync::Arc;

use crate::config::RateLimitSettings;
use crate::error::GatewayError;
use crate::gateway::request::ChatRequest;
use crate::gateway::results::{ChatContext, build_context_block};
use crate::middleware::logging::{log_admission, log_rejection};
use crate::rate_limit::{RateLimiter, get_client_identifier};
use crate::retrieval::{CorpusStore, retrieve};

/// Request handler sitting in front of the generation backend.
///
/// The limiter and corpus are injected so several gateways (or tests) can
/// share or isolate them.
pub struct ChatGateway {
    limiter: Arc<RateLimiter>,
    corpus: Arc<CorpusStore>,
    limits: RateLimitSettings,
}

impl ChatGateway {
    pub fn new(
        limiter: Arc<RateLimiter>,
        corpus: Arc<CorpusStore>,
        limits: RateLimitSettings,
    ) -> Self {
        Self {
            limiter,
            corpus,
            limits,
        }
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn corpus(&self) -> &Arc<CorpusStore> {
        &self.corpus
    }

    /// Admit the request, then gather evidence documents for its message.
    pub fn handle(&self, request: &ChatRequest) -> Result<ChatContext, GatewayError> {
        let client_id = get_client_identifier(&request.headers);

        if self.limits.enabled {
            let result = self.limiter.check_rate_limit(
                &client_id,
                self.limits.max_per_minute,
                self.limits.max_per_hour,
            )?;
            if let Some(window) = result.exceeded_window {
                log_rejection(&client_id, window);
                return Err(GatewayError::RateLimited(window));
            }
        }

        let message = request.trimmed_message();
        if message.is_empty() {
            return Err(GatewayError::EmptyMessage);
        }

        let snapshot = self.corpus.snapshot();
        let documents = retrieve(message, &snapshot);
        log_admission(&client_id, documents.len());

        Ok(ChatContext {
            context_block: build_context_block(&documents),
            client_id,
            documents,
        })
    }
}
