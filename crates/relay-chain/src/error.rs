use std::time::Duration;

use relay_core::Amount;
use thiserror::Error;

/// Why a handler refused to let a request continue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Rejection {
    #[error("missing Authorization header")]
    MissingCredentials,

    #[error("malformed Authorization header, expected 'Bearer <token>'")]
    MalformedCredentials,

    #[error("role '{actual}' does not satisfy required role '{required}'")]
    Forbidden { required: String, actual: String },

    #[error("rate limit of {max_requests} request(s) per {}ms exceeded", window.as_millis())]
    RateLimited { max_requests: u32, window: Duration },

    #[error("request {field} must not be empty")]
    MissingField { field: &'static str },

    #[error("expense of {amount} exceeds the {tier} limit of {limit} and no higher tier exists")]
    ApprovalLimitExceeded {
        amount: Amount,
        tier: String,
        limit: Amount,
    },

    #[error("{0}")]
    Custom(String),
}

/// A request was rejected part-way through a chain.
#[derive(Debug, Error)]
#[error("request rejected by '{handler}'")]
pub struct ChainError {
    handler: String,
    #[source]
    reason: Rejection,
}

impl ChainError {
    #[must_use]
    pub fn rejected(handler: impl Into<String>, reason: Rejection) -> Self {
        Self {
            handler: handler.into(),
            reason,
        }
    }

    /// Name of the handler that stopped the chain.
    #[must_use]
    pub fn handler(&self) -> &str {
        &self.handler
    }

    #[must_use]
    pub fn reason(&self) -> &Rejection {
        &self.reason
    }
}

pub type Result<T> = std::result::Result<T, ChainError>;
