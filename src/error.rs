// ABOUTME: Application-wide error types for dbr.
// ABOUTME: Uses thiserror and maps every failure to a process exit code.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Session(#[from] crate::session::Error),
}

impl Error {
    /// Exit status for this error: 2 for configuration problems, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::MissingEnvVar(_) | Error::InvalidConfig(_) => 2,
            Error::Session(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
