// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`argv`] builds the concrete argument vector for a platform family.
//! - [`launcher`] starts the child with stdin, stdout and stderr piped.
//! - [`drainer`] reads one output stream line by line, decoding and
//!   capturing it.
//! - [`handle`] owns the lifecycle: it joins both drainers, then waits for
//!   the exit, and exposes input, close and forced exit.
//! - [`run_config`] holds the per-handle settings and callbacks.

pub mod argv;
pub mod drainer;
pub mod handle;
pub mod launcher;
pub(crate) mod process;
pub mod run_config;

pub use argv::build_argv;
pub use handle::ProcessHandle;
pub use run_config::{LineCallback, RunConfig};

use crate::errors::CmdError;

/// Run `tokens` once on a fresh handle and return the captured stdout.
///
/// This is the unit of work a scheduler triggers.
pub async fn run_command<S: AsRef<str>>(tokens: &[S], config: RunConfig) -> Result<String, CmdError> {
    ProcessHandle::new(config).run(tokens).await
}
