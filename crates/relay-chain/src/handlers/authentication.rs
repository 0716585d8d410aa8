use tracing::debug;

use crate::context::Context;
use crate::error::{ChainError, Rejection, Result};
use crate::handler::{Handler, Next};
use crate::request::Request;

const AUTHORIZATION: &str = "Authorization";
const BEARER: &str = "Bearer ";

/// Rejects requests without a `Bearer <token>` Authorization header.
///
/// Only the shape of the header is checked; the token is never verified.
#[derive(Debug, Default)]
pub struct AuthenticationHandler;

impl AuthenticationHandler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn check(request: &Request) -> std::result::Result<(), Rejection> {
        let header = request
            .headers
            .get(AUTHORIZATION)
            .ok_or(Rejection::MissingCredentials)?;

        match header.strip_prefix(BEARER) {
            Some(token) if !token.trim().is_empty() => Ok(()),
            _ => Err(Rejection::MalformedCredentials),
        }
    }
}

impl Handler<Request> for AuthenticationHandler {
    fn name(&self) -> &str {
        "authentication"
    }

    fn handle(&self, ctx: &Context, request: &mut Request, next: Next<'_, Request>) -> Result<()> {
        Self::check(request).map_err(|reason| ChainError::rejected(self.name(), reason))?;
        debug!(correlation_id = ctx.correlation_id(), "request authenticated");
        next.run(ctx, request)
    }
}
