use std::time::{Duration, Instant};

use crate::state::SagaState;

/// Status of a step in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StepStatus {
    /// Step started and has not returned yet.
    Started,
    /// Step executed successfully.
    Executed,
    /// Step failed during execution.
    Failed,
    /// Step was compensated successfully.
    Compensated,
    /// Step compensation failed.
    CompensationFailed,
}

/// Record of a step's execution in the saga.
#[derive(Debug)]
pub struct StepRecord {
    /// Name of the step.
    pub name: String,
    /// Current status.
    pub status: StepStatus,
    /// When the step started executing.
    pub started_at: Instant,
    /// When the step completed (execution or compensation).
    pub completed_at: Option<Instant>,
    /// Description of compensation (if applicable).
    pub compensation_description: Option<String>,
}

impl StepRecord {
    /// Time between the step starting and its last recorded transition.
    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        self.completed_at
            .map(|done| done.saturating_duration_since(self.started_at))
    }
}

/// Audit log tracking every step execution and compensation in a saga.
///
/// Records are indexed by position in the saga plan. Steps after the
/// failing one never start, so they never appear.
#[derive(Debug, Default)]
pub struct SagaAuditLog {
    records: Vec<StepRecord>,
    state: SagaState,
}

impl SagaAuditLog {
    /// Create a new empty audit log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_start(&mut self, name: &str) {
        self.records.push(StepRecord {
            name: name.to_string(),
            status: StepStatus::Started,
            started_at: Instant::now(),
            completed_at: None,
            compensation_description: None,
        });
    }

    pub(crate) fn record_failure(&mut self) {
        if let Some(record) = self.records.last_mut() {
            record.status = StepStatus::Failed;
            record.completed_at = Some(Instant::now());
        }
    }

    pub(crate) fn record_success(&mut self, compensation_description: String) {
        if let Some(record) = self.records.last_mut() {
            record.status = StepStatus::Executed;
            record.completed_at = Some(Instant::now());
            record.compensation_description = Some(compensation_description);
        }
    }

    pub(crate) fn record_compensated(&mut self, index: usize) {
        self.mark(index, StepStatus::Compensated);
    }

    pub(crate) fn record_compensation_failed(&mut self, index: usize) {
        self.mark(index, StepStatus::CompensationFailed);
    }

    pub(crate) fn transition(&mut self, state: SagaState) {
        self.state = state;
    }

    fn mark(&mut self, index: usize, status: StepStatus) {
        if let Some(record) = self.records.get_mut(index) {
            record.status = status;
            record.completed_at = Some(Instant::now());
        }
    }

    /// Get all records in the audit log.
    #[must_use]
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// State the saga was in when the log was last updated.
    #[must_use]
    pub fn state(&self) -> SagaState {
        self.state
    }

    /// Names of steps with the given status, in plan order.
    #[must_use]
    pub fn steps_with_status(&self, status: StepStatus) -> Vec<&str> {
        self.records
            .iter()
            .filter(|record| record.status == status)
            .map(|record| record.name.as_str())
            .collect()
    }

    /// Get a summary of the saga execution for display.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        for record in &self.records {
            let status = match record.status {
                StepStatus::Started => "…",
                StepStatus::Executed => "✓",
                StepStatus::Failed => "✗",
                StepStatus::Compensated => "↩",
                StepStatus::CompensationFailed => "⚠",
            };
            lines.push(format!("{status} {}", record.name));
        }
        lines.push(format!("saga {}", self.state));
        lines.join("\n")
    }
}
