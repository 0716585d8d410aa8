//! Ordered handler chains with short-circuiting.
//!
//! A [`HandlerChain`] runs a request through handlers in the order they were
//! linked. Each handler either rejects (ending traversal), handles the
//! request and stops, or delegates to the rest of the chain through [`Next`].
//! The same machinery drives an HTTP-style request pipeline and a tiered
//! expense approval workflow.

mod approval;
mod context;
mod error;
mod handler;
pub mod handlers;
mod pipeline;
mod request;

pub use approval::{ApprovalTier, ExpenseRequest, approval_chain, default_tiers};
pub use context::Context;
pub use error::{ChainError, Rejection, Result};
pub use handler::{Handler, HandlerChain, Next};
pub use pipeline::{PipelineSettings, standard_pipeline};
pub use relay_core::{Amount, AmountError};
pub use request::{Headers, Request, Response};
