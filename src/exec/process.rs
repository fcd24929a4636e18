// src/exec/process.rs

//! OS-specific termination helpers.

use std::io;

use tokio::process::Child;
#[cfg(unix)]
use tracing::debug;

/// Force-terminate `child` immediately.
///
/// On Unix the child is its own process-group leader (see
/// [`crate::exec::launcher`]), so the whole group receives `SIGKILL`; this
/// also takes down grandchildren that still hold the output pipes.
pub(crate) fn force_kill(child: &mut Child) -> io::Result<()> {
    #[cfg(unix)]
    kill_process_group(child);

    child.start_kill()
}

/// Kill the process group of `child` via `killpg(SIGKILL)`.
///
/// No-op if the child has already been reaped or its PID cannot be
/// represented as `i32`.
#[cfg(unix)]
fn kill_process_group(child: &Child) {
    if let Some(pid) = child.id()
        && let Ok(pid) = i32::try_from(pid)
    {
        let pgid = nix::unistd::Pid::from_raw(pid);
        if let Err(errno) = nix::sys::signal::killpg(pgid, nix::sys::signal::Signal::SIGKILL) {
            debug!(pid, error = %errno, "killpg failed; falling back to killing the child");
        }
    }
}

/// Signal number that terminated the process, if any.
#[cfg(unix)]
pub(crate) fn terminating_signal(status: &std::process::ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
pub(crate) fn terminating_signal(_status: &std::process::ExitStatus) -> Option<i32> {
    None
}
