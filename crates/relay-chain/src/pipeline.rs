use std::time::Duration;

use crate::handler::HandlerChain;
use crate::handlers::{
    AuthenticationHandler, AuthorizationHandler, BusinessLogicHandler, LoggingHandler,
    RateLimitHandler, ValidationHandler,
};
use crate::request::Request;

/// Policy knobs for [`standard_pipeline`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Empty means any authenticated role is allowed.
    pub required_role: String,
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            required_role: String::new(),
            max_requests: 100,
            window: Duration::from_secs(1),
        }
    }
}

/// Logging, validation, authentication, authorization, rate limiting, then
/// business logic.
#[must_use]
pub fn standard_pipeline(settings: &PipelineSettings) -> HandlerChain<Request> {
    HandlerChain::new(LoggingHandler::new())
        .set_next(ValidationHandler::new())
        .set_next(AuthenticationHandler::new())
        .set_next(AuthorizationHandler::new(settings.required_role.clone()))
        .set_next(RateLimitHandler::new(settings.max_requests, settings.window))
        .set_next(BusinessLogicHandler::new())
}
