//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::exitcode;
use crate::infrastructure::traits::ApiError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => exitcode::CANTCREAT,
                InfraError::Application(e) => application_exit_code(e),
            },
        }
    }
}

fn application_exit_code(e: &ApplicationError) -> i32 {
    match e {
        ApplicationError::Api(api) => api_exit_code(api),
        ApplicationError::ActionFailed { cause: None, .. } => exitcode::DATAERR,
        ApplicationError::ActionFailed {
            cause: Some(api), ..
        } => api_exit_code(api),
        ApplicationError::NotAuthenticated => exitcode::NOPERM,
        ApplicationError::Config { .. } => exitcode::CONFIG,
        ApplicationError::Session { .. } => exitcode::IOERR,
    }
}

fn api_exit_code(e: &ApiError) -> i32 {
    match e {
        _ if e.is_unauthorized() => exitcode::NOPERM,
        ApiError::Status { status, .. } if *status < 500 => exitcode::DATAERR,
        ApiError::Status { .. } | ApiError::Transport(_) => exitcode::UNAVAILABLE,
        ApiError::Decode(_) => exitcode::SOFTWARE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_unauthorized_cause_when_mapping_then_noperm() {
        let err = CliError::from(ApplicationError::ActionFailed {
            message: "Failed to create link: nope".into(),
            cause: Some(ApiError::Status {
                status: 401,
                detail: None,
            }),
        });
        assert_eq!(err.exit_code(), exitcode::NOPERM);
    }

    #[test]
    fn given_validation_failure_when_mapping_then_dataerr() {
        let err = CliError::from(ApplicationError::ActionFailed {
            message: "a link needs a target".into(),
            cause: None,
        });
        assert_eq!(err.exit_code(), exitcode::DATAERR);
    }

    #[test]
    fn given_client_build_failure_when_mapping_then_unavailable() {
        let err = CliError::from(InfraError::from(ApplicationError::from(
            ApiError::Transport("build HTTP client: no TLS backend".into()),
        )));
        assert_eq!(err.exit_code(), exitcode::UNAVAILABLE);
    }
}
