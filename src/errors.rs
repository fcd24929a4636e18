// src/errors.rs

//! Crate-wide error types.
//!
//! - [`CmdError`] covers everything a `ProcessHandle` can report.
//! - [`CmdrunError`] is the outer error used by config loading and the CLI.

use std::fmt;

use thiserror::Error;

use crate::types::{Phase, Pipe};

/// Why a started process did not finish successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitFailure {
    /// Exited on its own with a non-zero code.
    Code(i32),
    /// Terminated by a signal it was not sent by us.
    Signal(i32),
    /// Force-terminated through `ProcessHandle::exit`.
    Killed,
    /// Waiting for the process failed.
    Wait(String),
}

impl ExitFailure {
    /// Exit code to propagate to a parent process, if one makes sense.
    pub fn code(&self) -> Option<i32> {
        match self {
            ExitFailure::Code(code) => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for ExitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitFailure::Code(code) => write!(f, "exit status: {code}"),
            ExitFailure::Signal(sig) => write!(f, "terminated by signal {sig}"),
            ExitFailure::Killed => write!(f, "process was killed"),
            ExitFailure::Wait(reason) => write!(f, "wait failed: {reason}"),
        }
    }
}

/// Errors reported by a `ProcessHandle`.
#[derive(Debug, Error)]
pub enum CmdError {
    /// One of the child's pipes could not be obtained; the process was not
    /// left running.
    #[error("failed to obtain {0} pipe for child process")]
    Launch(Pipe),

    /// The OS refused to start the program.
    #[error("failed to start `{program}`: {source}")]
    Start {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran but did not succeed. `stderr` holds whatever the
    /// error stream captured.
    #[error("{failure}")]
    Runtime { failure: ExitFailure, stderr: String },

    /// Write or close attempted on an input stream that is already closed.
    #[error("stdin pipe is already closed")]
    ClosedPipe,

    /// Operation needs a running process.
    #[error("process is not running (phase: {phase})")]
    NotRunning { phase: Phase },

    /// `run` was called on a handle that has already been used.
    #[error("process handle has already been run")]
    AlreadyUsed,

    /// No command tokens were given.
    #[error("no command to run")]
    EmptyCommand,

    /// Writing to the child's stdin failed.
    #[error("stdin I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CmdError {
    /// Captured stderr text for runtime failures, empty otherwise.
    pub fn stderr(&self) -> &str {
        match self {
            CmdError::Runtime { stderr, .. } => stderr,
            _ => "",
        }
    }

    pub fn exit_failure(&self) -> Option<&ExitFailure> {
        match self {
            CmdError::Runtime { failure, .. } => Some(failure),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum CmdrunError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Cmd(#[from] CmdError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, CmdrunError>;
