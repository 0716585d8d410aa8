use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};

use relay_core::Amount;

use crate::error::{CheckoutError, Result};
use crate::traits::{ChargeId, Inventory, Notifier, OrderStore, PaymentGateway, ReservationId};

/// Backend operations that can be made to fail on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Reserve,
    Release,
    Charge,
    Refund,
    CreateOrder,
    CancelOrder,
    Notify,
}

impl Operation {
    pub const ALL: [Self; 7] = [
        Self::Reserve,
        Self::Release,
        Self::Charge,
        Self::Refund,
        Self::CreateOrder,
        Self::CancelOrder,
        Self::Notify,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reserve => "reserve",
            Self::Release => "release",
            Self::Charge => "charge",
            Self::Refund => "refund",
            Self::CreateOrder => "create-order",
            Self::CancelOrder => "cancel-order",
            Self::Notify => "notify",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|op| op.as_str()).collect();
                format!("unknown operation '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

#[derive(Debug)]
struct Reservation {
    sku: String,
    quantity: u32,
}

#[derive(Debug)]
struct Order {
    sku: String,
    quantity: u32,
    amount: Amount,
}

#[derive(Debug, Default)]
struct State {
    stock: HashMap<String, u32>,
    reservations: HashMap<ReservationId, Reservation>,
    charges: HashMap<ChargeId, Amount>,
    orders: HashMap<String, Order>,
    outbox: Vec<(String, String)>,
    journal: Vec<String>,
    failing: HashSet<Operation>,
    decline_above: Option<Amount>,
    reservations_issued: u64,
    charges_issued: u64,
}

impl State {
    fn next_reservation_id(&mut self) -> ReservationId {
        self.reservations_issued += 1;
        ReservationId(format!("R{}", self.reservations_issued))
    }

    fn next_charge_id(&mut self) -> ChargeId {
        self.charges_issued += 1;
        ChargeId(format!("C{}", self.charges_issued))
    }

    fn check(&self, operation: Operation) -> Result<()> {
        if self.failing.contains(&operation) {
            return Err(CheckoutError::Unavailable(operation));
        }
        Ok(())
    }
}

/// A single in-process store backing every checkout trait.
///
/// Every successful call is appended to a journal, so callers can see the
/// exact order in which effects were applied and undone.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_stock(self, sku: impl Into<String>, quantity: u32) -> Self {
        self.lock().stock.insert(sku.into(), quantity);
        self
    }

    /// Decline any charge larger than `limit`.
    #[must_use]
    pub fn decline_above(self, limit: Amount) -> Self {
        self.lock().decline_above = Some(limit);
        self
    }

    /// Make every call of `operation` fail from now on.
    pub fn fail_on(&self, operation: Operation) {
        self.lock().failing.insert(operation);
    }

    #[must_use]
    pub fn stock(&self, sku: &str) -> Option<u32> {
        self.lock().stock.get(sku).copied()
    }

    #[must_use]
    pub fn active_reservations(&self) -> usize {
        self.lock().reservations.len()
    }

    #[must_use]
    pub fn captured_total(&self) -> Amount {
        let cents = self.lock().charges.values().map(|amount| amount.cents()).sum();
        Amount::from_cents(cents)
    }

    #[must_use]
    pub fn has_order(&self, order_id: &str) -> bool {
        self.lock().orders.contains_key(order_id)
    }

    /// Messages delivered so far, as `(recipient, message)`.
    #[must_use]
    pub fn outbox(&self) -> Vec<(String, String)> {
        self.lock().outbox.clone()
    }

    #[must_use]
    pub fn journal(&self) -> Vec<String> {
        self.lock().journal.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Inventory for InMemoryStore {
    fn reserve(&self, order_id: &str, sku: &str, quantity: u32) -> Result<ReservationId> {
        let mut state = self.lock();
        state.check(Operation::Reserve)?;

        let available = *state
            .stock
            .get(sku)
            .ok_or_else(|| CheckoutError::UnknownSku(sku.to_string()))?;
        if available < quantity {
            return Err(CheckoutError::OutOfStock {
                sku: sku.to_string(),
                requested: quantity,
                available,
            });
        }

        state.stock.insert(sku.to_string(), available - quantity);
        let id = state.next_reservation_id();
        state.reservations.insert(
            id.clone(),
            Reservation {
                sku: sku.to_string(),
                quantity,
            },
        );
        state
            .journal
            .push(format!("reserve {order_id} {sku} x{quantity} -> {id}"));
        Ok(id)
    }

    fn release(&self, reservation: &ReservationId) -> Result<()> {
        let mut state = self.lock();
        state.check(Operation::Release)?;

        let held = state
            .reservations
            .remove(reservation)
            .ok_or_else(|| CheckoutError::UnknownReservation(reservation.to_string()))?;
        *state.stock.entry(held.sku).or_default() += held.quantity;
        state.journal.push(format!("release {reservation}"));
        Ok(())
    }
}

impl PaymentGateway for InMemoryStore {
    fn charge(&self, order_id: &str, amount: Amount) -> Result<ChargeId> {
        let mut state = self.lock();
        state.check(Operation::Charge)?;

        if state.decline_above.is_some_and(|limit| amount > limit) {
            return Err(CheckoutError::PaymentDeclined {
                order_id: order_id.to_string(),
                amount,
            });
        }

        let id = state.next_charge_id();
        state.charges.insert(id.clone(), amount);
        state.journal.push(format!("charge {order_id} {amount} -> {id}"));
        Ok(id)
    }

    fn refund(&self, charge: &ChargeId) -> Result<()> {
        let mut state = self.lock();
        state.check(Operation::Refund)?;

        state
            .charges
            .remove(charge)
            .ok_or_else(|| CheckoutError::UnknownCharge(charge.to_string()))?;
        state.journal.push(format!("refund {charge}"));
        Ok(())
    }
}

impl OrderStore for InMemoryStore {
    fn create(&self, order_id: &str, sku: &str, quantity: u32, amount: Amount) -> Result<()> {
        let mut state = self.lock();
        state.check(Operation::CreateOrder)?;

        if state.orders.contains_key(order_id) {
            return Err(CheckoutError::DuplicateOrder(order_id.to_string()));
        }
        state.orders.insert(
            order_id.to_string(),
            Order {
                sku: sku.to_string(),
                quantity,
                amount,
            },
        );
        state.journal.push(format!("create {order_id}"));
        Ok(())
    }

    fn cancel(&self, order_id: &str) -> Result<()> {
        let mut state = self.lock();
        state.check(Operation::CancelOrder)?;

        let order = state
            .orders
            .remove(order_id)
            .ok_or_else(|| CheckoutError::UnknownOrder(order_id.to_string()))?;
        state.journal.push(format!(
            "cancel {order_id} ({} x{} {})",
            order.sku, order.quantity, order.amount
        ));
        Ok(())
    }
}

impl Notifier for InMemoryStore {
    fn send(&self, recipient: &str, message: &str) -> Result<()> {
        let mut state = self.lock();
        if state.check(Operation::Notify).is_err() {
            return Err(CheckoutError::NotificationFailed(recipient.to_string()));
        }

        state
            .outbox
            .push((recipient.to_string(), message.to_string()));
        state.journal.push(format!("notify {recipient}"));
        Ok(())
    }
}
