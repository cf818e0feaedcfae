//! Application-level errors (wraps backend errors)

use thiserror::Error;

use crate::infrastructure::traits::ApiError;

/// Application errors wrap backend errors and add store-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Api(#[from] ApiError),

    /// An action finished with the message recorded in the shared error field.
    /// `cause` is the backend failure, absent when validation stopped the request.
    #[error("{message}")]
    ActionFailed {
        message: String,
        #[source]
        cause: Option<ApiError>,
    },

    #[error("not logged in (run `mechtree auth login`)")]
    NotAuthenticated,

    #[error("config error: {message}")]
    Config { message: String },

    #[error("session storage: {context}")]
    Session {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
