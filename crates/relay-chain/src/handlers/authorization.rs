use tracing::debug;

use crate::context::Context;
use crate::error::{ChainError, Rejection, Result};
use crate::handler::{Handler, Next};
use crate::request::Request;

/// Role that satisfies any required role.
pub const ADMIN_ROLE: &str = "admin";

/// Rejects requests whose role does not satisfy the required role.
///
/// An empty required role allows any role. `admin` satisfies every role.
#[derive(Debug, Default)]
pub struct AuthorizationHandler {
    required_role: String,
}

impl AuthorizationHandler {
    #[must_use]
    pub fn new(required_role: impl Into<String>) -> Self {
        Self {
            required_role: required_role.into(),
        }
    }

    #[must_use]
    pub fn required_role(&self) -> &str {
        &self.required_role
    }

    fn permits(&self, role: &str) -> bool {
        self.required_role.is_empty() || role == self.required_role || role == ADMIN_ROLE
    }
}

impl Handler<Request> for AuthorizationHandler {
    fn name(&self) -> &str {
        "authorization"
    }

    fn handle(&self, ctx: &Context, request: &mut Request, next: Next<'_, Request>) -> Result<()> {
        if !self.permits(&request.role) {
            return Err(ChainError::rejected(
                self.name(),
                Rejection::Forbidden {
                    required: self.required_role.clone(),
                    actual: request.role.clone(),
                },
            ));
        }
        debug!(
            correlation_id = ctx.correlation_id(),
            role = %request.role,
            "request authorized"
        );
        next.run(ctx, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_requirement_allows_any_role() {
        let handler = AuthorizationHandler::default();

        assert!(handler.permits(""));
        assert!(handler.permits("viewer"));
    }

    #[test]
    fn exact_role_and_admin_are_permitted() {
        let handler = AuthorizationHandler::new("editor");

        assert!(handler.permits("editor"));
        assert!(handler.permits(ADMIN_ROLE));
        assert!(!handler.permits("viewer"));
        assert!(!handler.permits(""));
        assert!(!handler.permits("Editor"));
    }

    #[test]
    fn rejection_reports_required_and_actual_roles() {
        let chain = crate::HandlerChain::new(AuthorizationHandler::new("editor"));
        let mut request = Request::new("GET", "/").with_role("viewer");

        let err = chain
            .handle(&Context::default(), &mut request)
            .expect_err("viewer is not an editor");

        assert_eq!(
            err.reason(),
            &Rejection::Forbidden {
                required: "editor".to_string(),
                actual: "viewer".to_string(),
            }
        );
    }
}
