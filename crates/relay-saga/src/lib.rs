//! Saga coordinator for multi-step operations with compensation.
//!
//! A saga runs an ordered list of reversible steps. When a step fails, every
//! step that already succeeded is compensated in strict reverse order. If a
//! compensation itself fails the unwind stops and the failure is reported
//! distinctly, since the system is then left partially compensated.

mod audit;
mod error;
mod saga;
mod state;
mod step;

pub use audit::{SagaAuditLog, StepRecord, StepStatus};
pub use error::{CompensationError, SagaError};
pub use saga::{Saga, SagaReport};
pub use state::SagaState;
pub use step::SagaStep;
