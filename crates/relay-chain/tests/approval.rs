//! Integration tests for tiered expense approval.

use relay_chain::{
    Amount, ApprovalTier, Context, ExpenseRequest, Rejection, approval_chain, default_tiers,
};

fn submit(amount: &str) -> (relay_chain::Result<()>, ExpenseRequest) {
    let chain = approval_chain(default_tiers()).expect("default tiers");
    let amount: Amount = amount.parse().expect("valid amount");
    let mut request = ExpenseRequest::new(amount, "conference travel", "bob");
    let result = chain.handle(&Context::new("exp-1"), &mut request);
    (result, request)
}

#[test]
fn each_amount_is_approved_by_the_first_sufficient_tier() {
    let cases = [
        ("0.01", "Manager"),
        ("1000.00", "Manager"),
        ("1000.01", "Director"),
        ("5000", "Director"),
        ("5000.01", "CFO"),
        ("20000.00", "CFO"),
    ];

    for (amount, expected) in cases {
        let (result, request) = submit(amount);

        assert!(result.is_ok(), "{amount} should be approved");
        assert_eq!(request.approved_by.as_deref(), Some(expected), "{amount}");
    }
}

#[test]
fn no_escalation_beyond_the_last_tier() {
    let (result, request) = submit("20000.01");

    let err = result.expect_err("exceeds every tier");
    assert!(request.approved_by.is_none());
    assert_eq!(err.handler(), "CFO");
    assert_eq!(
        err.reason(),
        &Rejection::ApprovalLimitExceeded {
            amount: Amount::from_cents(2_000_001),
            tier: "CFO".to_string(),
            limit: Amount::from_dollars(20_000),
        }
    );
}

#[test]
fn single_tier_chain_rejects_above_its_limit() {
    let chain = approval_chain([ApprovalTier::new("Owner", Amount::from_dollars(10))])
        .expect("one tier");
    let mut request = ExpenseRequest::new(Amount::from_cents(1_001), "lunch", "carol");

    let err = chain
        .handle(&Context::default(), &mut request)
        .expect_err("over the only limit");

    assert_eq!(err.handler(), "Owner");
}
