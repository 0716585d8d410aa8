use std::sync::Arc;

use clap::Args;
use relay_checkout::{
    CheckoutContext, FailingStep, InMemoryStore, Operation, OrderRequest, checkout_saga,
};
use relay_core::Amount;
use relay_saga::SagaAuditLog;

use crate::error::Result;

#[derive(Args)]
pub(crate) struct CheckoutArgs {
    /// Order identifier
    #[arg(long = "order")]
    order_id: String,

    /// Product to buy
    #[arg(long)]
    sku: String,

    #[arg(long, default_value_t = 1)]
    quantity: u32,

    /// Amount to charge, e.g. 50.00
    #[arg(long)]
    amount: Amount,

    /// Where the confirmation goes
    #[arg(long, default_value = "customer@example.com")]
    customer: String,

    /// Units of the SKU in stock before checkout
    #[arg(long, default_value_t = 10)]
    stock: u32,

    /// Decline charges above this amount
    #[arg(long)]
    decline_above: Option<Amount>,

    /// Make the named step fail; unknown names add a failing step at the end
    #[arg(long)]
    fail_at: Option<String>,

    /// Make a backend operation fail, including compensations (repeatable)
    #[arg(long = "break", value_name = "OPERATION")]
    broken: Vec<Operation>,
}

pub(crate) fn run(args: CheckoutArgs) -> Result<()> {
    let mut store = InMemoryStore::new().with_stock(&args.sku, args.stock);
    if let Some(limit) = args.decline_above {
        store = store.decline_above(limit);
    }
    let store = Arc::new(store);
    for operation in &args.broken {
        store.fail_on(*operation);
    }

    let order = OrderRequest {
        order_id: args.order_id,
        sku: args.sku,
        quantity: args.quantity,
        amount: args.amount,
        customer: args.customer,
    };
    let mut saga = checkout_saga(&order);

    if let Some(step) = args.fail_at {
        match step_operation(&step) {
            Some(operation) => store.fail_on(operation),
            None => saga.add_step(FailingStep::new(step)),
        }
    }

    let ctx = CheckoutContext::in_memory(&store);
    let (result, audit) = saga.execute_with_audit(&ctx);

    print_outcome(&audit, &store.journal());
    result?;

    println!("order {} committed", order.order_id);
    Ok(())
}

fn step_operation(step: &str) -> Option<Operation> {
    match step {
        "ReserveInventory" => Some(Operation::Reserve),
        "ChargePayment" => Some(Operation::Charge),
        "CreateOrder" => Some(Operation::CreateOrder),
        "SendNotification" => Some(Operation::Notify),
        _ => None,
    }
}

fn print_outcome(audit: &SagaAuditLog, journal: &[String]) {
    println!("{}", audit.summary());

    if !journal.is_empty() {
        println!();
        println!("Journal:");
        for entry in journal {
            println!("  {entry}");
        }
    }
}
