use std::sync::Arc;

use crate::context::Context;
use crate::error::Result;

/// A single link in a [`HandlerChain`].
///
/// A handler either returns an error (nothing after it runs), returns
/// `Ok(())` without touching `next` (the chain stops here), or calls
/// `next.run` to hand the request to the rest of the chain. Because `next`
/// is passed by value, a handler can also do work after the rest of the
/// chain returns.
pub trait Handler<R>: Send + Sync {
    /// Name used in rejections and log lines.
    fn name(&self) -> &str;

    /// # Errors
    ///
    /// Returns an error if this handler, or any handler after it, rejects the request.
    fn handle(&self, ctx: &Context, request: &mut R, next: Next<'_, R>) -> Result<()>;
}

impl<R, H> Handler<R> for Arc<H>
where
    H: Handler<R> + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn handle(&self, ctx: &Context, request: &mut R, next: Next<'_, R>) -> Result<()> {
        (**self).handle(ctx, request, next)
    }
}

/// The remainder of a chain after the current handler.
pub struct Next<'a, R> {
    rest: &'a [Box<dyn Handler<R>>],
}

impl<R> Next<'_, R> {
    /// Delegate to the next handler. Past the end of the chain this is `Ok(())`.
    ///
    /// # Errors
    ///
    /// Returns the first rejection raised by the remaining handlers.
    pub fn run(self, ctx: &Context, request: &mut R) -> Result<()> {
        match self.rest.split_first() {
            Some((head, tail)) => head.handle(ctx, request, Next { rest: tail }),
            None => Ok(()),
        }
    }

    /// Whether no handler follows the current one.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.rest.is_empty()
    }
}

/// An ordered, owned sequence of handlers.
///
/// Each handler is moved into exactly one position, so a chain can never
/// contain a cycle or the same handler instance twice. To share state between
/// positions or chains, link an `Arc<H>`.
pub struct HandlerChain<R> {
    handlers: Vec<Box<dyn Handler<R>>>,
}

impl<R> HandlerChain<R> {
    /// Start a chain with its head handler.
    #[must_use]
    pub fn new<H>(head: H) -> Self
    where
        H: Handler<R> + 'static,
    {
        Self {
            handlers: vec![Box::new(head)],
        }
    }

    /// Link `handler` after the current tail.
    ///
    /// Returns the chain, so `HandlerChain::new(a).set_next(b).set_next(c)`
    /// runs `a`, then `b`, then `c`.
    #[must_use]
    pub fn set_next<H>(mut self, handler: H) -> Self
    where
        H: Handler<R> + 'static,
    {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Run `request` through the chain from the head.
    ///
    /// # Errors
    ///
    /// Returns the rejection of the first handler that refuses the request.
    pub fn handle(&self, ctx: &Context, request: &mut R) -> Result<()> {
        Next {
            rest: &self.handlers,
        }
        .run(ctx, request)
    }

    /// Handler names in traversal order.
    #[must_use]
    pub fn handler_names(&self) -> Vec<&str> {
        self.handlers.iter().map(|handler| handler.name()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
