//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::exitcode;
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
                InfraError::Io { .. } => exitcode::IOERR,
                InfraError::Application(app) => match app {
                    ApplicationError::InvalidInput { .. } => exitcode::NOINPUT,
                    ApplicationError::Domain(DomainError::SourceNotDirectory(_)) => {
                        exitcode::NOINPUT
                    }
                    ApplicationError::Domain(DomainError::DestinationInsideSource { .. }) => {
                        exitcode::USAGE
                    }
                    ApplicationError::Domain(DomainError::EmptyPattern(_))
                    | ApplicationError::Config { .. } => exitcode::CONFIG,
                    ApplicationError::OperationFailed { .. } => exitcode::IOERR,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn given_invalid_input_when_exit_code_then_noinput() {
        let err: CliError = ApplicationError::InvalidInput {
            path: PathBuf::from("missing"),
            reason: "no such directory".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exitcode::NOINPUT);
    }

    #[test]
    fn given_io_failure_when_exit_code_then_ioerr() {
        let err: CliError = ApplicationError::OperationFailed {
            context: "write out/App.sln".into(),
            source: Box::new(std::io::Error::other("disk full")),
        }
        .into();
        assert_eq!(err.exit_code(), exitcode::IOERR);
        assert_eq!(err.to_string(), "write out/App.sln: disk full");
    }

    #[test]
    fn given_config_error_when_exit_code_then_config() {
        let err: CliError = ApplicationError::Config {
            message: "parse x.toml".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exitcode::CONFIG);
    }
}
