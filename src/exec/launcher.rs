// src/exec/launcher.rs

//! Process launcher: spawns the child with three separate pipes.

use std::process::Stdio;

use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};
use tracing::{debug, warn};

use crate::errors::CmdError;
use crate::exec::process::force_kill;
use crate::types::Pipe;

/// A started child together with its pipes.
pub struct Launched {
    pub child: Child,
    pub stdin: ChildStdin,
    pub stdout: ChildStdout,
    pub stderr: ChildStderr,
}

/// Start `argv[0]` with the remaining elements as arguments.
///
/// - [`CmdError::Start`] if the OS refuses to start the program.
/// - [`CmdError::Launch`] if a pipe is missing on the spawned child; the
///   child is killed before returning so it never runs unattended.
pub fn launch(argv: &[String]) -> Result<Launched, CmdError> {
    let (program, args) = argv.split_first().ok_or(CmdError::EmptyCommand)?;

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    // Own process group so a forced kill reaches the whole tree.
    #[cfg(unix)]
    cmd.process_group(0);

    let mut child = cmd.spawn().map_err(|source| CmdError::Start {
        program: program.clone(),
        source,
    })?;

    debug!(program = %program, pid = ?child.id(), "child process spawned");

    let Some(stdin) = child.stdin.take() else {
        return Err(abandon(child, Pipe::Stdin));
    };
    let Some(stdout) = child.stdout.take() else {
        return Err(abandon(child, Pipe::Stdout));
    };
    let Some(stderr) = child.stderr.take() else {
        return Err(abandon(child, Pipe::Stderr));
    };

    Ok(Launched {
        child,
        stdin,
        stdout,
        stderr,
    })
}

fn abandon(mut child: Child, pipe: Pipe) -> CmdError {
    if let Err(e) = force_kill(&mut child) {
        warn!(pipe = %pipe, error = %e, "failed to kill child after missing pipe");
    }
    CmdError::Launch(pipe)
}
