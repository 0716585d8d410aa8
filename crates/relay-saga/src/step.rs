/// A step in a saga that can be executed and compensated.
///
/// Steps own whatever state they need to undo their own work. A step whose
/// forward action never took effect must treat `compensate` as a no-op.
///
/// # Type Parameters
///
/// - `Context`: Shared dependencies (injected, not owned by the step)
/// - `Error`: The error type for step failures
pub trait SagaStep: Send {
    /// Shared context providing dependencies.
    type Context;

    /// Error type for step failures.
    type Error;

    /// Human-readable name for logging and error messages.
    fn name(&self) -> &str;

    /// Run the forward action.
    ///
    /// # Errors
    ///
    /// Returns an error if the step fails to complete.
    fn execute(&mut self, ctx: &Self::Context) -> Result<(), Self::Error>;

    /// Compensate (undo) the step's effects.
    ///
    /// Called during rollback when a later step fails. The default
    /// implementation is a no-op, suitable for read-only steps.
    ///
    /// # Errors
    ///
    /// Returns an error if compensation fails.
    fn compensate(&mut self, ctx: &Self::Context) -> Result<(), Self::Error> {
        let _ = ctx;
        Ok(())
    }

    /// Human-readable description of what compensation will do.
    fn compensation_description(&self) -> String {
        format!("undo {}", self.name())
    }
}
