use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

use crate::context::Context;
use crate::error::Result;
use crate::handler::{Handler, Next};
use crate::request::{Request, Response};

/// Terminal handler: always succeeds and fills in the response.
///
/// Nothing after this handler runs, even if more handlers were linked.
#[derive(Debug, Default)]
pub struct BusinessLogicHandler {
    invocations: AtomicUsize,
}

impl BusinessLogicHandler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests that reached this handler.
    #[must_use]
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

impl Handler<Request> for BusinessLogicHandler {
    fn name(&self) -> &str {
        "business_logic"
    }

    fn handle(&self, ctx: &Context, request: &mut Request, _next: Next<'_, Request>) -> Result<()> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        debug!(
            correlation_id = ctx.correlation_id(),
            method = %request.method,
            path = %request.path,
            "processing request"
        );
        request.response = Some(Response::ok(format!(
            "{} {} processed",
            request.method, request.path
        )));
        Ok(())
    }
}
