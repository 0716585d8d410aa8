use relay_core::Amount;
use serde::Deserialize;
use tracing::debug;

use crate::context::Context;
use crate::error::{ChainError, Rejection, Result};
use crate::handler::{Handler, HandlerChain, Next};

/// An expense waiting for sign-off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseRequest {
    pub amount: Amount,
    pub description: String,
    pub requester: String,
    /// Title of the tier that approved the expense, once one has.
    pub approved_by: Option<String>,
}

impl ExpenseRequest {
    #[must_use]
    pub fn new(amount: Amount, description: impl Into<String>, requester: impl Into<String>) -> Self {
        Self {
            amount,
            description: description.into(),
            requester: requester.into(),
            approved_by: None,
        }
    }
}

/// One level of approval authority.
///
/// Approves anything up to and including its limit. Larger amounts go to the
/// next tier; the last tier in a chain rejects them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApprovalTier {
    title: String,
    limit: Amount,
}

impl ApprovalTier {
    #[must_use]
    pub fn new(title: impl Into<String>, limit: Amount) -> Self {
        Self {
            title: title.into(),
            limit,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn limit(&self) -> Amount {
        self.limit
    }
}

impl Handler<ExpenseRequest> for ApprovalTier {
    fn name(&self) -> &str {
        &self.title
    }

    fn handle(
        &self,
        ctx: &Context,
        request: &mut ExpenseRequest,
        next: Next<'_, ExpenseRequest>,
    ) -> Result<()> {
        if request.amount <= self.limit {
            debug!(
                correlation_id = ctx.correlation_id(),
                tier = %self.title,
                amount = %request.amount,
                requester = %request.requester,
                "expense approved"
            );
            request.approved_by = Some(self.title.clone());
            return Ok(());
        }

        if next.is_end() {
            return Err(ChainError::rejected(
                self.name(),
                Rejection::ApprovalLimitExceeded {
                    amount: request.amount,
                    tier: self.title.clone(),
                    limit: self.limit,
                },
            ));
        }

        debug!(
            correlation_id = ctx.correlation_id(),
            tier = %self.title,
            amount = %request.amount,
            "expense above tier limit, escalating"
        );
        next.run(ctx, request)
    }
}

/// Manager up to $1000.00, Director up to $5000.00, CFO up to $20000.00.
#[must_use]
pub fn default_tiers() -> Vec<ApprovalTier> {
    vec![
        ApprovalTier::new("Manager", Amount::from_dollars(1_000)),
        ApprovalTier::new("Director", Amount::from_dollars(5_000)),
        ApprovalTier::new("CFO", Amount::from_dollars(20_000)),
    ]
}

/// Build an approval chain with tiers ordered by ascending limit.
///
/// Returns `None` when `tiers` is empty, since such a chain could never
/// approve anything.
#[must_use]
pub fn approval_chain(
    tiers: impl IntoIterator<Item = ApprovalTier>,
) -> Option<HandlerChain<ExpenseRequest>> {
    let mut tiers: Vec<ApprovalTier> = tiers.into_iter().collect();
    tiers.sort_by_key(ApprovalTier::limit);

    let mut tiers = tiers.into_iter();
    let head = tiers.next()?;
    Some(tiers.fold(HandlerChain::new(head), |chain, tier| chain.set_next(tier)))
}
