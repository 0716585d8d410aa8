//! Checkout as a saga.
//!
//! Reserving stock, charging the customer, recording the order and sending
//! the confirmation each run as a step with a matching compensation. The
//! backends are traits so the same steps run against the in-memory store or
//! anything else.

mod context;
mod error;
mod memory;
mod steps;
mod traits;

pub use context::CheckoutContext;
pub use error::{CheckoutError, Result};
pub use memory::{InMemoryStore, Operation};
pub use steps::{
    ChargePayment, CheckoutSaga, CreateOrder, FailingStep, OrderRequest, ReserveInventory,
    SendNotification, checkout_saga,
};
pub use traits::{ChargeId, Inventory, Notifier, OrderStore, PaymentGateway, ReservationId};
