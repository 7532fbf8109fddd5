use thiserror::Error;

/// Failures raised by the flow machinery itself, as opposed to failures of
/// user operations, which travel through unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("payload is not a value of type {expected}")]
    TypeMismatch { expected: &'static str },
    #[error("joined future did not complete: {0}")]
    JoinFailed(String),
    #[error("no Tokio runtime is available to drive the joined futures")]
    NoRuntime,
}
