use std::sync::Arc;

use crate::memory::InMemoryStore;
use crate::traits::{Inventory, Notifier, OrderStore, PaymentGateway};

/// Backends the checkout steps act on.
#[derive(Clone)]
pub struct CheckoutContext {
    inventory: Arc<dyn Inventory>,
    payments: Arc<dyn PaymentGateway>,
    orders: Arc<dyn OrderStore>,
    notifier: Arc<dyn Notifier>,
}

impl CheckoutContext {
    #[must_use]
    pub fn new(
        inventory: Arc<dyn Inventory>,
        payments: Arc<dyn PaymentGateway>,
        orders: Arc<dyn OrderStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            inventory,
            payments,
            orders,
            notifier,
        }
    }

    /// Use one in-memory store for every backend.
    #[must_use]
    pub fn in_memory(store: &Arc<InMemoryStore>) -> Self {
        Self::new(
            Arc::clone(store) as Arc<dyn Inventory>,
            Arc::clone(store) as Arc<dyn PaymentGateway>,
            Arc::clone(store) as Arc<dyn OrderStore>,
            Arc::clone(store) as Arc<dyn Notifier>,
        )
    }

    #[must_use]
    pub fn inventory(&self) -> &dyn Inventory {
        self.inventory.as_ref()
    }

    #[must_use]
    pub fn payments(&self) -> &dyn PaymentGateway {
        self.payments.as_ref()
    }

    #[must_use]
    pub fn orders(&self) -> &dyn OrderStore {
        self.orders.as_ref()
    }

    #[must_use]
    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }
}
