/// Per-call values threaded through every handler.
///
/// Handlers are not required to observe anything here; the correlation id
/// ties log lines from one traversal together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    correlation_id: String,
}

impl Context {
    #[must_use]
    pub fn new(correlation_id: impl Into<String>) -> Self {
        Self {
            correlation_id: correlation_id.into(),
        }
    }

    #[must_use]
    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new("-")
    }
}
