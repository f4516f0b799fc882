//! Error taxonomy of the interpreter and the diagnostic line format.

use crate::command::ExitCode;
use std::fmt;
use std::io;
use thiserror::Error;

/// Failures the shell reports to the user.
///
/// Every variant carries the exit status the failing command leaves behind.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("not found")]
    NotFound,
    #[error("Illegal number: {0}")]
    IllegalNumber(String),
    #[error("Unable to add/remove from environment")]
    Environment,
    #[error("can't cd to {0}")]
    CannotCd(String),
    #[error("{0} not found")]
    AliasNotFound(String),
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Spawn(#[source] io::Error),
    #[error("Can't open {0}")]
    CannotOpen(String),
}

impl ShellError {
    /// Exit status left by a command that failed with this error.
    pub fn status(&self) -> ExitCode {
        match self {
            ShellError::NotFound => 127,
            ShellError::AliasNotFound(_) => 1,
            ShellError::Spawn(e) if e.kind() == io::ErrorKind::NotFound => 127,
            ShellError::Spawn(_) => 126,
            ShellError::IllegalNumber(_)
            | ShellError::Environment
            | ShellError::CannotCd(_)
            | ShellError::Usage(_)
            | ShellError::CannotOpen(_) => 2,
        }
    }
}

/// Exit status for an arbitrary command failure.
///
/// Untyped errors (I/O failures while writing output and the like) count as a
/// generic failure.
pub fn status_of(err: &anyhow::Error) -> ExitCode {
    err.downcast_ref::<ShellError>()
        .map(ShellError::status)
        .unwrap_or(1)
}

/// One diagnostic line: `<shell>: <index>: <command>: <cause>`.
///
/// `command` is omitted for messages that are not tied to a command, such as the
/// fatal script-open failure.
pub struct Diagnostic<'a> {
    pub shell_name: &'a str,
    pub index: usize,
    pub command: Option<&'a str>,
    pub cause: &'a dyn fmt::Display,
}

impl fmt::Display for Diagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: ", self.shell_name, self.index)?;
        if let Some(command) = self.command {
            write!(f, "{}: ", command)?;
        }
        write!(f, "{}", self.cause)
    }
}
