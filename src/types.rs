// src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Operating-system family the argument vector is built for.
///
/// The family decides how command steps are chained (`&` through `cmd.exe`
/// versus `&&` through `sh`) and whether non-UTF-8 output is transcoded from
/// the legacy codepage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    /// Family of the host this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    pub fn is_windows(self) -> bool {
        matches!(self, Platform::Windows)
    }
}

impl Default for Platform {
    fn default() -> Self {
        Platform::current()
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "windows" => Ok(Platform::Windows),
            "unix" | "linux" | "macos" => Ok(Platform::Unix),
            other => Err(format!(
                "invalid platform: {other} (expected \"windows\" or \"unix\")"
            )),
        }
    }
}

/// Which child output stream a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Stdout => write!(f, "stdout"),
            StreamKind::Stderr => write!(f, "stderr"),
        }
    }
}

/// One of the three pipes connecting the child to its handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipe {
    Stdin,
    Stdout,
    Stderr,
}

impl fmt::Display for Pipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pipe::Stdin => write!(f, "stdin"),
            Pipe::Stdout => write!(f, "stdout"),
            Pipe::Stderr => write!(f, "stderr"),
        }
    }
}

/// Lifecycle of a `ProcessHandle`.
///
/// `Unstarted → Launched → Running → {Completed | Failed}`. There is no
/// transition back to `Unstarted`; a handle runs at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unstarted,
    /// Child spawned and all three pipes obtained.
    Launched,
    /// Drainers attached; the controller is waiting on them.
    Running,
    Completed,
    Failed,
}

impl Phase {
    pub fn is_finished(self) -> bool {
        matches!(self, Phase::Completed | Phase::Failed)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Unstarted => "unstarted",
            Phase::Launched => "launched",
            Phase::Running => "running",
            Phase::Completed => "completed",
            Phase::Failed => "failed",
        };
        f.write_str(s)
    }
}
