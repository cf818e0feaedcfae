//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::MechanicId;

/// Domain errors represent validation and decoding violations.
/// These are independent of transport concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("mechanic name cannot be empty")]
    EmptyName,

    #[error("select a source mechanic")]
    MissingSource,

    #[error("select a target mechanic")]
    MissingTarget,

    #[error("link cannot point to itself: {0}")]
    SelfLink(MechanicId),

    #[error("unknown link type: {0}")]
    UnknownLinkKind(String),

    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("username must be between 3 and 255 characters")]
    UsernameLength,

    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },

    #[error("malformed tree: {0}")]
    MalformedTree(String),

    #[error("unexpected response body: {0}")]
    UnexpectedBody(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
