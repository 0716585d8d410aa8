use std::fmt;

use relay_core::Amount;

use crate::Result;

/// Handle for a stock reservation, needed to release it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReservationId(pub String);

/// Handle for a captured payment, needed to refund it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChargeId(pub String);

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ChargeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait Inventory: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the SKU is unknown or has too little stock.
    fn reserve(&self, order_id: &str, sku: &str, quantity: u32) -> Result<ReservationId>;

    /// # Errors
    ///
    /// Returns an error if the reservation does not exist or cannot be released.
    fn release(&self, reservation: &ReservationId) -> Result<()>;
}

pub trait PaymentGateway: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the payment is declined.
    fn charge(&self, order_id: &str, amount: Amount) -> Result<ChargeId>;

    /// # Errors
    ///
    /// Returns an error if the charge does not exist or cannot be refunded.
    fn refund(&self, charge: &ChargeId) -> Result<()>;
}

pub trait OrderStore: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the order already exists.
    fn create(&self, order_id: &str, sku: &str, quantity: u32, amount: Amount) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the order does not exist.
    fn cancel(&self, order_id: &str) -> Result<()>;
}

pub trait Notifier: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the message cannot be delivered.
    fn send(&self, recipient: &str, message: &str) -> Result<()>;
}
