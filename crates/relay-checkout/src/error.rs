use relay_core::Amount;
use thiserror::Error;

use crate::memory::Operation;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CheckoutError {
    #[error("unknown SKU '{0}'")]
    UnknownSku(String),

    #[error("insufficient stock for '{sku}': requested {requested}, available {available}")]
    OutOfStock {
        sku: String,
        requested: u32,
        available: u32,
    },

    #[error("no reservation '{0}'")]
    UnknownReservation(String),

    #[error("payment of {amount} for order '{order_id}' was declined")]
    PaymentDeclined { order_id: String, amount: Amount },

    #[error("no charge '{0}'")]
    UnknownCharge(String),

    #[error("order '{0}' already exists")]
    DuplicateOrder(String),

    #[error("order '{0}' does not exist")]
    UnknownOrder(String),

    #[error("could not notify '{0}'")]
    NotificationFailed(String),

    #[error("{0} is unavailable")]
    Unavailable(Operation),

    #[error("step '{0}' failed")]
    Injected(String),
}

pub type Result<T> = std::result::Result<T, CheckoutError>;
