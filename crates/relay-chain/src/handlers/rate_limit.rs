use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::context::Context;
use crate::error::{ChainError, Rejection, Result};
use crate::handler::{Handler, Next};
use crate::request::Request;

/// Source of the current time for windowed handlers.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

#[derive(Debug)]
struct Window {
    started_at: Instant,
    count: u32,
}

/// Fixed-window request limiter.
///
/// The counter belongs to the handler instance, so every request passing
/// through this handler shares one budget regardless of who sent it. The
/// counter and the window start live under one lock so that the reset check
/// and the increment happen atomically.
#[derive(Debug)]
pub struct RateLimitHandler<C = SystemClock> {
    max_requests: u32,
    window: Duration,
    state: Mutex<Window>,
    clock: C,
}

impl RateLimitHandler<SystemClock> {
    #[must_use]
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self::with_clock(max_requests, window, SystemClock)
    }
}

impl<C: Clock> RateLimitHandler<C> {
    #[must_use]
    pub fn with_clock(max_requests: u32, window: Duration, clock: C) -> Self {
        let started_at = clock.now();
        Self {
            max_requests,
            window,
            state: Mutex::new(Window {
                started_at,
                count: 0,
            }),
            clock,
        }
    }

    #[must_use]
    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Count one request and report whether it fits in the current window.
    fn admit(&self) -> bool {
        let now = self.clock.now();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if now.saturating_duration_since(state.started_at) >= self.window {
            state.started_at = now;
            state.count = 0;
        }
        state.count = state.count.saturating_add(1);
        state.count <= self.max_requests
    }
}

impl<C: Clock> Handler<Request> for RateLimitHandler<C> {
    fn name(&self) -> &str {
        "rate_limit"
    }

    fn handle(&self, ctx: &Context, request: &mut Request, next: Next<'_, Request>) -> Result<()> {
        if !self.admit() {
            warn!(
                correlation_id = ctx.correlation_id(),
                max_requests = self.max_requests,
                window_ms = u64::try_from(self.window.as_millis()).unwrap_or(u64::MAX),
                "rate limit exceeded"
            );
            return Err(ChainError::rejected(
                self.name(),
                Rejection::RateLimited {
                    max_requests: self.max_requests,
                    window: self.window,
                },
            ));
        }
        debug!(correlation_id = ctx.correlation_id(), "request within rate limit");
        next.run(ctx, request)
    }
}
