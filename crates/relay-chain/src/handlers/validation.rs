use crate::context::Context;
use crate::error::{ChainError, Rejection, Result};
use crate::handler::{Handler, Next};
use crate::request::Request;

/// Rejects requests with an empty method or path.
#[derive(Debug, Default)]
pub struct ValidationHandler;

impl ValidationHandler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Handler<Request> for ValidationHandler {
    fn name(&self) -> &str {
        "validation"
    }

    fn handle(&self, ctx: &Context, request: &mut Request, next: Next<'_, Request>) -> Result<()> {
        let missing = if request.method.trim().is_empty() {
            Some("method")
        } else if request.path.trim().is_empty() {
            Some("path")
        } else {
            None
        };

        if let Some(field) = missing {
            return Err(ChainError::rejected(
                self.name(),
                Rejection::MissingField { field },
            ));
        }
        next.run(ctx, request)
    }
}
