//! Handlers for the HTTP-style request pipeline.

mod authentication;
mod authorization;
mod business;
mod logging;
mod rate_limit;
mod validation;

pub use authentication::AuthenticationHandler;
pub use authorization::{ADMIN_ROLE, AuthorizationHandler};
pub use business::BusinessLogicHandler;
pub use logging::LoggingHandler;
pub use rate_limit::{Clock, ManualClock, RateLimitHandler, SystemClock};
pub use validation::ValidationHandler;
