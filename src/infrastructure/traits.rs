//! I/O boundary traits for testability
//!
//! These traits abstract the backend and the session storage, allowing the store
//! to be tested with in-process implementations.

use std::io;

use thiserror::Error;

use crate::domain::{ApiReply, ApiRequest, Session};

/// Failure of a single backend call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Non-success HTTP status.
    #[error("{} (HTTP {status})", .detail.as_deref().unwrap_or("request rejected"))]
    Status { status: u16, detail: Option<String> },

    /// Connection, DNS, timeout.
    #[error("network error: {0}")]
    Transport(String),

    /// Success status but the body did not match the contract.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401 | 403, .. })
    }
}

/// Backend abstraction: performs one request, no retries.
pub trait Backend: Send + Sync {
    /// Execute `request`, attaching `token` as bearer credentials when given.
    fn execute(&self, request: &ApiRequest, token: Option<&str>) -> Result<ApiReply, ApiError>;
}

/// Persistent storage for the login session.
pub trait SessionStore: Send + Sync {
    /// Load the stored session, `None` when logged out.
    fn load(&self) -> io::Result<Option<Session>>;

    /// Store the session, replacing any previous one.
    fn save(&self, session: &Session) -> io::Result<()>;

    /// Remove the stored session. Succeeds when nothing is stored.
    fn clear(&self) -> io::Result<()>;
}
