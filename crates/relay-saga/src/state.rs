use std::fmt;

/// Lifecycle of a single saga execution.
///
/// `Running` moves to `Committed` when every step succeeds, or to
/// `Compensating` on the first failure. `Compensating` always ends in
/// `Aborted`, whether or not every compensation succeeded. A failed step is
/// never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum SagaState {
    #[default]
    Running,
    Compensating,
    Committed,
    Aborted,
}

impl SagaState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Committed | Self::Aborted)
    }
}

impl fmt::Display for SagaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Running => "running",
            Self::Compensating => "compensating",
            Self::Committed => "committed",
            Self::Aborted => "aborted",
        };
        f.write_str(label)
    }
}
