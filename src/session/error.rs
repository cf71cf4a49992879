// ABOUTME: Session driver error types.
// ABOUTME: Covers client launch, prompt and completion timeouts, exit status, and script errors.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to start {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("client stdin could not be attached")]
    StdinUnavailable,

    #[error("client stdout/stderr could not be attached")]
    OutputUnavailable,

    #[error("time-out after {} waiting for '{prompt}'", human(.timeout))]
    PromptTimeout { prompt: String, timeout: Duration },

    #[error("client output closed before '{prompt}' appeared")]
    OutputClosed { prompt: String },

    #[error("time-out after {} waiting for client to finish", human(.0))]
    CompletionTimeout(Duration),

    #[error("failed to wait for client: {0}")]
    Wait(#[source] std::io::Error),

    #[error("client exited unsuccessfully: {0}")]
    ExitStatus(ExitStatus),

    #[error("{} {} occurred during SQL execution", .0, error_noun(.0))]
    ScriptErrors(usize),
}

fn human(duration: &Duration) -> humantime::FormattedDuration {
    humantime::format_duration(*duration)
}

fn error_noun(count: &usize) -> &'static str {
    if *count == 1 { "error" } else { "errors" }
}

pub type Result<T> = std::result::Result<T, Error>;
