use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// The callback carried a `state` that does not match the one bound to the session.
    #[error("Suspicious operation: {0}")]
    SuspiciousOperation(String),
    #[error("Session store error: {0}")]
    Session(String),
    #[error("Authentication backend error: {0}")]
    Backend(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::Session(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Internal(format!("Serialization error: {}", err))
    }
}
