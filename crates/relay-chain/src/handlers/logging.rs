use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tracing::{info, warn};

use crate::context::Context;
use crate::error::Result;
use crate::handler::{Handler, Next};
use crate::request::Request;

/// Wraps the rest of the chain, logging elapsed time and the outcome.
///
/// Never rejects on its own; whatever the rest of the chain returns is
/// passed back unchanged.
#[derive(Debug, Default)]
pub struct LoggingHandler {
    completed: AtomicU64,
    rejected: AtomicU64,
}

impl LoggingHandler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }
}

impl Handler<Request> for LoggingHandler {
    fn name(&self) -> &str {
        "logging"
    }

    fn handle(&self, ctx: &Context, request: &mut Request, next: Next<'_, Request>) -> Result<()> {
        let started = Instant::now();
        let result = next.run(ctx, request);
        let elapsed_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

        match &result {
            Ok(()) => {
                self.completed.fetch_add(1, Ordering::Relaxed);
                // A chain without a terminal handler still completes, just with no body.
                let status = request.response.as_ref().map_or(204, |r| r.status);
                info!(
                    correlation_id = ctx.correlation_id(),
                    method = %request.method,
                    path = %request.path,
                    status,
                    elapsed_us,
                    "request completed"
                );
            }
            Err(err) => {
                self.rejected.fetch_add(1, Ordering::Relaxed);
                warn!(
                    correlation_id = ctx.correlation_id(),
                    method = %request.method,
                    path = %request.path,
                    handler = err.handler(),
                    reason = %err.reason(),
                    elapsed_us,
                    "request rejected"
                );
            }
        }

        result
    }
}
