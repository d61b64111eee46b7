use thiserror::Error;

/// Errors surfaced to the shopper by preference operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrefsError {
    #[error("please provide a valid email")]
    InvalidEmail(String),
}

pub type PrefsResult<T> = Result<T, PrefsError>;
