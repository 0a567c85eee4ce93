use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid brief: {0}")]
    InvalidBrief(String),
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}
