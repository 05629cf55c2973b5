use thiserror::Error;

/// Failure of a whole call.
///
/// Per-item failures (missing key, rejected payload, conflict) are never reported here;
/// they travel inside [`Outcome`](crate::Outcome). An `AccessError` means the call itself
/// did not complete, and none of its partial results should be trusted as a complete answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AccessError {
    /// The caller's cancellation signal fired before the call completed.
    #[error("operation cancelled")]
    Cancelled,

    /// Arguments break the contract of the operation (e.g. mismatched key/value counts).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The adapter cannot evaluate this specification shape.
    #[error("unsupported specification '{label}' (depth {depth}, adapter supports up to {max_depth})")]
    UnsupportedSpecification {
        label: String,
        depth: usize,
        max_depth: usize,
    },

    /// The backing store is closed or unreachable.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Unrecoverable adapter fault.
    #[error("storage error: {0}")]
    Storage(String),

    /// A sample was requested from a population with no elements.
    #[error("cannot sample from an empty population")]
    EmptyPopulation,

    #[error("requested {requested} samples without replacement from a population of {available}")]
    SampleExceedsPopulation { requested: usize, available: usize },

    #[error("configuration error: {0}")]
    Config(String),
}

impl AccessError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AccessError::Cancelled)
    }

    pub(crate) fn lock_poisoned(operation: &str) -> Self {
        AccessError::Storage(format!("lock poisoned during {}", operation))
    }
}
