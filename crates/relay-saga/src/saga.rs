use std::fmt::Debug;

use tracing::{debug, warn};

use crate::audit::SagaAuditLog;
use crate::error::{CompensationError, SagaError};
use crate::state::SagaState;
use crate::step::SagaStep;

type BoxedStep<Ctx, Err> = Box<dyn SagaStep<Context = Ctx, Error = Err>>;

/// Outcome of a saga in which every step succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SagaReport {
    /// Names of the committed steps, in execution order.
    pub committed: Vec<String>,
    /// Always [`SagaState::Committed`].
    pub state: SagaState,
}

/// An ordered plan of reversible steps.
///
/// Steps run in the order they were added. If any step fails, previously
/// completed steps are compensated in reverse order (LIFO). A saga is
/// single-use: [`Saga::execute`] consumes it.
pub struct Saga<Ctx, Err> {
    steps: Vec<BoxedStep<Ctx, Err>>,
}

impl<Ctx, Err> Default for Saga<Ctx, Err> {
    fn default() -> Self {
        Self { steps: Vec::new() }
    }
}

impl<Ctx, Err> Saga<Ctx, Err>
where
    Err: Debug,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step to the plan.
    pub fn add_step<S>(&mut self, step: S)
    where
        S: SagaStep<Context = Ctx, Error = Err> + 'static,
    {
        self.steps.push(Box::new(step));
    }

    /// Append a step and return the saga, for fluent construction.
    #[must_use]
    pub fn with_step<S>(mut self, step: S) -> Self
    where
        S: SagaStep<Context = Ctx, Error = Err> + 'static,
    {
        self.add_step(step);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Names of the planned steps, in execution order.
    #[must_use]
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    /// Execute the saga.
    ///
    /// An empty saga commits trivially.
    ///
    /// # Errors
    ///
    /// Returns `SagaError::StepFailed` if a step fails and every compensation succeeds.
    /// Returns `SagaError::CompensationFailed` if a compensation fails during rollback.
    pub fn execute(self, ctx: &Ctx) -> Result<SagaReport, SagaError<Err>> {
        let (result, _audit_log) = self.run(ctx);
        result
    }

    /// Execute the saga and return both the result and an audit log.
    pub fn execute_with_audit(
        self,
        ctx: &Ctx,
    ) -> (Result<SagaReport, SagaError<Err>>, SagaAuditLog) {
        self.run(ctx)
    }

    fn run(self, ctx: &Ctx) -> (Result<SagaReport, SagaError<Err>>, SagaAuditLog) {
        let mut steps = self.steps;
        let mut audit_log = SagaAuditLog::new();
        let mut completed: Vec<usize> = Vec::with_capacity(steps.len());
        let mut failure = None;

        for (index, step) in steps.iter_mut().enumerate() {
            audit_log.record_start(step.name());
            debug!(step = step.name(), index, "executing saga step");

            match step.execute(ctx) {
                Ok(()) => {
                    audit_log.record_success(step.compensation_description());
                    completed.push(index);
                }
                Err(error) => {
                    audit_log.record_failure();
                    failure = Some((step.name().to_string(), error));
                    break;
                }
            }
        }

        let Some((failed_step, step_error)) = failure else {
            audit_log.transition(SagaState::Committed);
            let committed = steps.iter().map(|step| step.name().to_string()).collect();
            debug!(steps = steps.len(), "saga committed");
            return (
                Ok(SagaReport {
                    committed,
                    state: SagaState::Committed,
                }),
                audit_log,
            );
        };

        warn!(
            step = %failed_step,
            error = ?step_error,
            completed = completed.len(),
            "saga step failed, compensating completed steps"
        );
        audit_log.transition(SagaState::Compensating);
        let saga_error = compensate(
            &mut steps,
            ctx,
            &mut audit_log,
            completed,
            failed_step,
            step_error,
        );
        audit_log.transition(SagaState::Aborted);
        (Err(saga_error), audit_log)
    }
}

fn compensate<Ctx, Err: Debug>(
    steps: &mut [BoxedStep<Ctx, Err>],
    ctx: &Ctx,
    audit_log: &mut SagaAuditLog,
    mut completed: Vec<usize>,
    failed_step: String,
    step_error: Err,
) -> SagaError<Err> {
    while let Some(index) = completed.pop() {
        let step = &mut steps[index];
        let step_name = step.name().to_string();
        let description = step.compensation_description();

        match step.compensate(ctx) {
            Ok(()) => {
                debug!(step = %step_name, "compensated saga step");
                audit_log.record_compensated(index);
            }
            Err(error) => {
                warn!(
                    step = %step_name,
                    error = ?error,
                    remaining = completed.len(),
                    "compensation failed, rollback stopped"
                );
                audit_log.record_compensation_failed(index);
                let uncompensated = completed
                    .iter()
                    .rev()
                    .map(|&i| steps[i].name().to_string())
                    .collect();
                return SagaError::CompensationFailed {
                    failed_step,
                    step_error,
                    compensation: CompensationError {
                        step: step_name,
                        description,
                        error,
                    },
                    uncompensated,
                };
            }
        }
    }

    SagaError::StepFailed {
        step: failed_step,
        source: step_error,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::audit::StepStatus;

    struct TestContext {
        log: RefCell<Vec<String>>,
    }

    impl TestContext {
        fn new() -> Self {
            Self {
                log: RefCell::new(Vec::new()),
            }
        }
    }

    #[derive(Debug, PartialEq, thiserror::Error)]
    #[error("{0}")]
    struct TestError(String);

    struct RecordingStep {
        name: &'static str,
        executed: bool,
    }

    impl RecordingStep {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                executed: false,
            }
        }
    }

    impl SagaStep for RecordingStep {
        type Context = TestContext;
        type Error = TestError;

        fn name(&self) -> &str {
            self.name
        }

        fn execute(&mut self, ctx: &Self::Context) -> Result<(), Self::Error> {
            ctx.log.borrow_mut().push(format!("execute {}", self.name));
            self.executed = true;
            Ok(())
        }

        fn compensate(&mut self, ctx: &Self::Context) -> Result<(), Self::Error> {
            if !self.executed {
                return Ok(());
            }
            ctx.log.borrow_mut().push(format!("compensate {}", self.name));
            self.executed = false;
            Ok(())
        }
    }

    struct FailingStep {
        name: &'static str,
    }

    impl SagaStep for FailingStep {
        type Context = TestContext;
        type Error = TestError;

        fn name(&self) -> &str {
            self.name
        }

        fn execute(&mut self, ctx: &Self::Context) -> Result<(), Self::Error> {
            ctx.log.borrow_mut().push(format!("execute {}", self.name));
            Err(TestError(format!("{} exploded", self.name)))
        }

        fn compensate(&mut self, ctx: &Self::Context) -> Result<(), Self::Error> {
            ctx.log.borrow_mut().push(format!("compensate {}", self.name));
            Ok(())
        }
    }

    struct FailingCompensationStep {
        name: &'static str,
    }

    impl SagaStep for FailingCompensationStep {
        type Context = TestContext;
        type Error = TestError;

        fn name(&self) -> &str {
            self.name
        }

        fn execute(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
            Ok(())
        }

        fn compensate(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
            Err(TestError(format!("compensation failed for {}", self.name)))
        }
    }

    struct ReadOnlyStep;

    impl SagaStep for ReadOnlyStep {
        type Context = TestContext;
        type Error = TestError;

        fn name(&self) -> &str {
            "read_only"
        }

        fn execute(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[test]
    fn all_steps_succeeding_commits_without_compensation() -> anyhow::Result<()> {
        let ctx = TestContext::new();

        let saga = Saga::new()
            .with_step(RecordingStep::new("a"))
            .with_step(RecordingStep::new("b"))
            .with_step(RecordingStep::new("c"));

        let report = saga.execute(&ctx)?;

        assert_eq!(report.committed, vec!["a", "b", "c"]);
        assert_eq!(report.state, SagaState::Committed);
        assert_eq!(
            *ctx.log.borrow(),
            vec!["execute a", "execute b", "execute c"]
        );
        Ok(())
    }

    #[test]
    fn empty_saga_commits() -> anyhow::Result<()> {
        let ctx = TestContext::new();
        let saga: Saga<TestContext, TestError> = Saga::new();

        assert!(saga.is_empty());
        let report = saga.execute(&ctx)?;

        assert!(report.committed.is_empty());
        Ok(())
    }

    #[test]
    fn compensation_runs_in_reverse_order_and_skips_failed_step() {
        let ctx = TestContext::new();

        let saga = Saga::new()
            .with_step(RecordingStep::new("a"))
            .with_step(RecordingStep::new("b"))
            .with_step(FailingStep { name: "c" })
            .with_step(RecordingStep::new("d"));

        let result = saga.execute(&ctx);

        let err = result.expect_err("should fail");
        assert!(matches!(err, SagaError::StepFailed { ref step, .. } if step == "c"));
        assert_eq!(
            *ctx.log.borrow(),
            vec![
                "execute a",
                "execute b",
                "execute c",
                "compensate b",
                "compensate a"
            ]
        );
    }

    #[test]
    fn read_only_step_uses_default_no_op_compensation() {
        let ctx = TestContext::new();

        let saga = Saga::new()
            .with_step(ReadOnlyStep)
            .with_step(FailingStep { name: "boom" });

        let result = saga.execute(&ctx);

        assert!(result.is_err());
        assert_eq!(*ctx.log.borrow(), vec!["execute boom"]);
    }

    #[test]
    fn first_step_failure_requires_no_compensation() {
        let ctx = TestContext::new();

        let saga = Saga::new().with_step(FailingStep { name: "first" });

        let err = saga.execute(&ctx).expect_err("should be an error");

        assert_eq!(err.failed_step(), "first");
        assert_eq!(err.step_error(), &TestError("first exploded".to_string()));
        assert_eq!(*ctx.log.borrow(), vec!["execute first"]);
    }

    #[test]
    fn compensation_failure_stops_the_unwind() {
        let ctx = TestContext::new();

        let saga = Saga::new()
            .with_step(RecordingStep::new("a"))
            .with_step(FailingCompensationStep { name: "b" })
            .with_step(RecordingStep::new("c"))
            .with_step(FailingStep { name: "d" });

        let err = saga.execute(&ctx).expect_err("should be an error");

        match err {
            SagaError::CompensationFailed {
                failed_step,
                step_error,
                compensation,
                uncompensated,
            } => {
                assert_eq!(failed_step, "d");
                assert_eq!(step_error, TestError("d exploded".to_string()));
                assert_eq!(compensation.step, "b");
                assert_eq!(compensation.description, "undo b");
                assert_eq!(uncompensated, vec!["a"]);
            }
            SagaError::StepFailed { .. } => panic!("expected CompensationFailed"),
        }

        let log = ctx.log.borrow();
        assert!(log.contains(&"compensate c".to_string()));
        assert!(!log.contains(&"compensate a".to_string()));
    }

    #[test]
    fn execute_with_audit_tracks_statuses_and_state() {
        let ctx = TestContext::new();

        let saga = Saga::new()
            .with_step(RecordingStep::new("a"))
            .with_step(FailingCompensationStep { name: "b" })
            .with_step(FailingStep { name: "c" })
            .with_step(RecordingStep::new("never"));

        let (result, audit_log) = saga.execute_with_audit(&ctx);

        assert!(result.is_err());
        assert_eq!(audit_log.state(), SagaState::Aborted);

        let records = audit_log.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].status, StepStatus::Executed);
        assert_eq!(records[1].status, StepStatus::CompensationFailed);
        assert_eq!(records[2].status, StepStatus::Failed);
    }

    #[test]
    fn add_step_and_step_names_follow_insertion_order() {
        let mut saga: Saga<TestContext, TestError> = Saga::new();
        saga.add_step(RecordingStep::new("first"));
        saga.add_step(ReadOnlyStep);

        assert_eq!(saga.len(), 2);
        assert_eq!(saga.step_names(), vec!["first", "read_only"]);
    }
}
