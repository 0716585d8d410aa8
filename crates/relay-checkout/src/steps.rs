use relay_core::Amount;
use relay_saga::{Saga, SagaStep};
use tracing::debug;

use crate::context::CheckoutContext;
use crate::error::{CheckoutError, Result};
use crate::traits::{ChargeId, ReservationId};

pub type CheckoutSaga = Saga<CheckoutContext, CheckoutError>;

/// Everything needed to run one checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub order_id: String,
    pub sku: String,
    pub quantity: u32,
    pub amount: Amount,
    pub customer: String,
}

/// Build the standard checkout plan: reserve, charge, create, notify.
#[must_use]
pub fn checkout_saga(order: &OrderRequest) -> CheckoutSaga {
    Saga::new()
        .with_step(ReserveInventory::new(
            &order.order_id,
            &order.sku,
            order.quantity,
        ))
        .with_step(ChargePayment::new(&order.order_id, order.amount))
        .with_step(CreateOrder::new(
            &order.order_id,
            &order.sku,
            order.quantity,
            order.amount,
        ))
        .with_step(SendNotification::new(&order.order_id, &order.customer))
}

#[derive(Debug)]
pub struct ReserveInventory {
    order_id: String,
    sku: String,
    quantity: u32,
    reservation: Option<ReservationId>,
}

impl ReserveInventory {
    #[must_use]
    pub fn new(order_id: &str, sku: &str, quantity: u32) -> Self {
        Self {
            order_id: order_id.to_string(),
            sku: sku.to_string(),
            quantity,
            reservation: None,
        }
    }
}

impl SagaStep for ReserveInventory {
    type Context = CheckoutContext;
    type Error = CheckoutError;

    fn name(&self) -> &str {
        "ReserveInventory"
    }

    fn execute(&mut self, ctx: &CheckoutContext) -> Result<()> {
        let id = ctx
            .inventory()
            .reserve(&self.order_id, &self.sku, self.quantity)?;
        debug!(order = %self.order_id, reservation = %id, "inventory reserved");
        self.reservation = Some(id);
        Ok(())
    }

    fn compensate(&mut self, ctx: &CheckoutContext) -> Result<()> {
        let Some(id) = &self.reservation else {
            return Ok(());
        };
        ctx.inventory().release(id)?;
        self.reservation = None;
        Ok(())
    }

    fn compensation_description(&self) -> String {
        format!("release {} x{}", self.sku, self.quantity)
    }
}

#[derive(Debug)]
pub struct ChargePayment {
    order_id: String,
    amount: Amount,
    charge: Option<ChargeId>,
}

impl ChargePayment {
    #[must_use]
    pub fn new(order_id: &str, amount: Amount) -> Self {
        Self {
            order_id: order_id.to_string(),
            amount,
            charge: None,
        }
    }
}

impl SagaStep for ChargePayment {
    type Context = CheckoutContext;
    type Error = CheckoutError;

    fn name(&self) -> &str {
        "ChargePayment"
    }

    fn execute(&mut self, ctx: &CheckoutContext) -> Result<()> {
        let id = ctx.payments().charge(&self.order_id, self.amount)?;
        debug!(order = %self.order_id, charge = %id, "payment captured");
        self.charge = Some(id);
        Ok(())
    }

    fn compensate(&mut self, ctx: &CheckoutContext) -> Result<()> {
        let Some(id) = &self.charge else {
            return Ok(());
        };
        ctx.payments().refund(id)?;
        self.charge = None;
        Ok(())
    }

    fn compensation_description(&self) -> String {
        format!("refund {}", self.amount)
    }
}

#[derive(Debug)]
pub struct CreateOrder {
    order_id: String,
    sku: String,
    quantity: u32,
    amount: Amount,
    created: bool,
}

impl CreateOrder {
    #[must_use]
    pub fn new(order_id: &str, sku: &str, quantity: u32, amount: Amount) -> Self {
        Self {
            order_id: order_id.to_string(),
            sku: sku.to_string(),
            quantity,
            amount,
            created: false,
        }
    }
}

impl SagaStep for CreateOrder {
    type Context = CheckoutContext;
    type Error = CheckoutError;

    fn name(&self) -> &str {
        "CreateOrder"
    }

    fn execute(&mut self, ctx: &CheckoutContext) -> Result<()> {
        ctx.orders()
            .create(&self.order_id, &self.sku, self.quantity, self.amount)?;
        self.created = true;
        Ok(())
    }

    fn compensate(&mut self, ctx: &CheckoutContext) -> Result<()> {
        if !self.created {
            return Ok(());
        }
        ctx.orders().cancel(&self.order_id)?;
        self.created = false;
        Ok(())
    }

    fn compensation_description(&self) -> String {
        format!("cancel order {}", self.order_id)
    }
}

/// Confirmation message to the customer.
///
/// A sent message cannot be unsent, so compensation delivers a
/// cancellation notice instead.
#[derive(Debug)]
pub struct SendNotification {
    order_id: String,
    recipient: String,
    sent: bool,
}

impl SendNotification {
    #[must_use]
    pub fn new(order_id: &str, recipient: &str) -> Self {
        Self {
            order_id: order_id.to_string(),
            recipient: recipient.to_string(),
            sent: false,
        }
    }
}

impl SagaStep for SendNotification {
    type Context = CheckoutContext;
    type Error = CheckoutError;

    fn name(&self) -> &str {
        "SendNotification"
    }

    fn execute(&mut self, ctx: &CheckoutContext) -> Result<()> {
        ctx.notifier().send(
            &self.recipient,
            &format!("order {} confirmed", self.order_id),
        )?;
        self.sent = true;
        Ok(())
    }

    fn compensate(&mut self, ctx: &CheckoutContext) -> Result<()> {
        if !self.sent {
            return Ok(());
        }
        ctx.notifier().send(
            &self.recipient,
            &format!("order {} cancelled", self.order_id),
        )?;
        self.sent = false;
        Ok(())
    }

    fn compensation_description(&self) -> String {
        format!("notify {} of cancellation", self.recipient)
    }
}

/// A step that always fails, for exercising rollback.
#[derive(Debug)]
pub struct FailingStep {
    name: String,
}

impl FailingStep {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl SagaStep for FailingStep {
    type Context = CheckoutContext;
    type Error = CheckoutError;

    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&mut self, _ctx: &CheckoutContext) -> Result<()> {
        Err(CheckoutError::Injected(self.name.clone()))
    }
}
