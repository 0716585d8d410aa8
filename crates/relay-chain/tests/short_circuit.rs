//! Integration tests for short-circuiting and handler ordering.

use std::sync::Arc;

use relay_chain::handlers::{
    AuthenticationHandler, AuthorizationHandler, BusinessLogicHandler, LoggingHandler,
    ValidationHandler,
};
use relay_chain::{Context, HandlerChain, Rejection, Request};

fn authenticated(method: &str, path: &str, role: &str) -> Request {
    Request::new(method, path)
        .with_header("Authorization", "Bearer token")
        .with_role(role)
}

#[test]
fn rejection_at_any_position_leaves_business_logic_untouched() {
    let failing_requests = [
        Request::new("GET", "/orders").with_role("editor"),
        authenticated("GET", "/orders", "viewer"),
        authenticated("", "/orders", "editor"),
        authenticated("GET", "", "editor"),
    ];

    for mut request in failing_requests {
        let business = Arc::new(BusinessLogicHandler::new());
        let chain = HandlerChain::new(LoggingHandler::new())
            .set_next(AuthenticationHandler::new())
            .set_next(AuthorizationHandler::new("editor"))
            .set_next(ValidationHandler::new())
            .set_next(Arc::clone(&business));

        let result = chain.handle(&Context::default(), &mut request);

        assert!(result.is_err(), "{request:?} should be rejected");
        assert_eq!(business.invocations(), 0);
        assert!(request.response.is_none());
    }
}

#[test]
fn accepted_request_reaches_business_logic_once() -> anyhow::Result<()> {
    let business = Arc::new(BusinessLogicHandler::new());
    let chain = HandlerChain::new(AuthenticationHandler::new())
        .set_next(AuthorizationHandler::new("editor"))
        .set_next(ValidationHandler::new())
        .set_next(Arc::clone(&business));

    let mut request = authenticated("GET", "/orders", "editor");
    chain.handle(&Context::default(), &mut request)?;

    assert_eq!(business.invocations(), 1);
    assert_eq!(request.response.map(|r| r.status), Some(200));
    Ok(())
}

#[test]
fn handler_order_changes_the_outcome() {
    let authorization_first = HandlerChain::new(AuthorizationHandler::new("admin"))
        .set_next(ValidationHandler::new())
        .set_next(BusinessLogicHandler::new());
    let validation_first = HandlerChain::new(ValidationHandler::new())
        .set_next(AuthorizationHandler::new("admin"))
        .set_next(BusinessLogicHandler::new());

    let malformed_and_unauthorized = Request::new("", "/reports");

    let err_a = authorization_first
        .handle(&Context::default(), &mut malformed_and_unauthorized.clone())
        .expect_err("rejected");
    let err_b = validation_first
        .handle(&Context::default(), &mut malformed_and_unauthorized.clone())
        .expect_err("rejected");

    assert_eq!(err_a.handler(), "authorization");
    assert!(matches!(err_a.reason(), Rejection::Forbidden { .. }));
    assert_eq!(err_b.handler(), "validation");
    assert_eq!(err_b.reason(), &Rejection::MissingField { field: "method" });
}

#[test]
fn empty_required_role_allows_any_authenticated_role() -> anyhow::Result<()> {
    let chain = HandlerChain::new(AuthenticationHandler::new())
        .set_next(AuthorizationHandler::new(""))
        .set_next(BusinessLogicHandler::new());

    let mut request = authenticated("GET", "/", "");
    chain.handle(&Context::default(), &mut request)?;

    assert!(request.response.is_some());
    Ok(())
}

#[test]
fn shared_chain_serves_requests_from_many_threads() {
    let business = Arc::new(BusinessLogicHandler::new());
    let chain = Arc::new(
        HandlerChain::new(AuthenticationHandler::new()).set_next(Arc::clone(&business)),
    );

    let handles: Vec<_> = (0..4)
        .map(|thread| {
            let chain = Arc::clone(&chain);
            std::thread::spawn(move || {
                for i in 0..10 {
                    let mut request = authenticated("GET", &format!("/t{thread}/{i}"), "");
                    chain
                        .handle(&Context::new(format!("{thread}-{i}")), &mut request)
                        .expect("authenticated request");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("thread panicked");
    }
    assert_eq!(business.invocations(), 40);
}
