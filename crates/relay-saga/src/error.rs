use std::fmt::Debug;

use thiserror::Error;

/// Error from a failed compensation operation.
#[derive(Debug, thiserror::Error)]
#[error("compensation failed for step '{step}': {description}")]
pub struct CompensationError<E> {
    /// Name of the step whose compensation failed.
    pub step: String,
    /// Description of what the compensation was trying to do.
    pub description: String,
    /// The underlying error.
    #[source]
    pub error: E,
}

/// Error from saga execution.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SagaError<E: Debug> {
    /// A step failed and every completed step was compensated.
    #[error("saga failed at step '{step}', rolled back cleanly")]
    StepFailed {
        /// Name of the step that failed.
        step: String,
        /// The error that caused the step to fail.
        #[source]
        source: E,
    },

    /// A step failed and the rollback stopped on a failed compensation.
    ///
    /// The step error appears in the message; the compensation error is the
    /// source. Steps listed in `uncompensated` still carry their forward effects.
    #[error(
        "saga failed at step '{failed_step}' ({step_error}) and rollback stopped at '{}'; state is inconsistent ({} step(s) left uncompensated)",
        compensation.step,
        uncompensated.len()
    )]
    CompensationFailed {
        /// Name of the step that originally failed.
        failed_step: String,
        /// The error from the failed step.
        step_error: E,
        /// The compensation that failed and stopped the unwind.
        #[source]
        compensation: CompensationError<E>,
        /// Completed steps that were never compensated, in unwind order.
        uncompensated: Vec<String>,
    },
}

impl<E: Debug> SagaError<E> {
    /// Name of the step whose forward action failed.
    #[must_use]
    pub fn failed_step(&self) -> &str {
        match self {
            Self::StepFailed { step, .. } => step,
            Self::CompensationFailed { failed_step, .. } => failed_step,
        }
    }

    /// The error that triggered the rollback.
    #[must_use]
    pub fn step_error(&self) -> &E {
        match self {
            Self::StepFailed { source, .. } => source,
            Self::CompensationFailed { step_error, .. } => step_error,
        }
    }

    /// Whether the rollback left forward effects in place.
    #[must_use]
    pub fn is_inconsistent(&self) -> bool {
        matches!(self, Self::CompensationFailed { .. })
    }
}
