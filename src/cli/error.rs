//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::exitcode;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("graph check failed: {issues} issue(s)")]
    GraphCheck { issues: usize },

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
            CliError::GraphCheck { .. } => exitcode::DATAERR,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => exitcode::IOERR,
                InfraError::Prompt { .. } => exitcode::NOINPUT,
                InfraError::Application(app) => match app {
                    ApplicationError::Domain(_) | ApplicationError::GraphFile { .. } => {
                        exitcode::DATAERR
                    }
                    ApplicationError::Config { .. } => exitcode::CONFIG,
                    ApplicationError::OperationFailed { .. } => exitcode::IOERR,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Answer, DomainError};

    #[test]
    fn given_traversal_fault_when_mapping_exit_code_then_data_error() {
        let err: CliError = ApplicationError::from(DomainError::MissingSuccessor {
            node: "q".to_string(),
            answer: Answer::Yes,
        })
        .into();
        assert_eq!(err.exit_code(), exitcode::DATAERR);
    }

    #[test]
    fn given_config_error_when_mapping_exit_code_then_config() {
        let err: CliError = ApplicationError::Config {
            message: "bad".to_string(),
        }
        .into();
        assert_eq!(err.exit_code(), exitcode::CONFIG);
    }
}
