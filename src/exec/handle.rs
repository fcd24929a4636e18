// src/exec/handle.rs

//! Lifecycle controller for a single external process execution.

use std::sync::{Mutex as StdMutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::{Child, ChildStdin};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinError;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::errors::{CmdError, ExitFailure};
use crate::exec::argv::{build_argv, print_argv, render_argv};
use crate::exec::drainer::{DrainSettings, spawn_drainer};
use crate::exec::launcher::{Launched, launch};
use crate::exec::process::{force_kill, terminating_signal};
use crate::exec::run_config::RunConfig;
use crate::types::{Phase, StreamKind};

/// How long drainers may keep reading after a forced kill before they are
/// abandoned.
pub const KILL_DRAIN_GRACE: Duration = Duration::from_secs(2);

enum StdinSlot {
    /// Not launched yet.
    Pending,
    Open(ChildStdin),
    Closed,
}

#[derive(Debug)]
struct HandleState {
    used: bool,
    stdout_text: String,
    stderr_text: String,
    exit_code: Option<i32>,
}

/// One external process execution.
///
/// A handle is single use: configure it, call [`run`](Self::run) once, and
/// read the captured buffers afterwards. While `run` is pending, other tasks
/// holding a reference (e.g. through an `Arc`) may feed input with
/// [`input_text`](Self::input_text), close stdin, or cancel with
/// [`exit`](Self::exit).
pub struct ProcessHandle {
    config: RunConfig,
    state: StdMutex<HandleState>,
    stdin: Mutex<StdinSlot>,
    phase_tx: watch::Sender<Phase>,
    cancel_tx: watch::Sender<bool>,
}

impl std::fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("config", &self.config)
            .field("phase", &self.phase())
            .finish()
    }
}

impl Default for ProcessHandle {
    fn default() -> Self {
        Self::new(RunConfig::default())
    }
}

impl ProcessHandle {
    pub fn new(config: RunConfig) -> Self {
        let (phase_tx, _) = watch::channel(Phase::Unstarted);
        let (cancel_tx, _) = watch::channel(false);
        Self {
            config,
            state: StdMutex::new(HandleState {
                used: false,
                stdout_text: String::new(),
                stderr_text: String::new(),
                exit_code: None,
            }),
            stdin: Mutex::new(StdinSlot::Pending),
            phase_tx,
            cancel_tx,
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Mutable access to the configuration. Only meaningful before `run`.
    pub fn config_mut(&mut self) -> &mut RunConfig {
        &mut self.config
    }

    pub fn phase(&self) -> Phase {
        *self.phase_tx.borrow()
    }

    /// Wait until `run` has left `Unstarted`, returning the phase reached.
    ///
    /// Once this returns `Launched` or `Running`, stdin accepts input.
    pub async fn wait_started(&self) -> Phase {
        let mut rx = self.phase_tx.subscribe();
        match rx.wait_for(|phase| *phase != Phase::Unstarted).await {
            Ok(phase) => *phase,
            Err(_) => self.phase(),
        }
    }

    /// Captured stdout. Complete once `run` has returned.
    pub fn stdout_text(&self) -> String {
        self.lock_state().stdout_text.clone()
    }

    /// Captured stderr. Complete once `run` has returned.
    pub fn stderr_text(&self) -> String {
        self.lock_state().stderr_text.clone()
    }

    /// Exit code of the finished process, if it exited normally.
    pub fn exit_code(&self) -> Option<i32> {
        self.lock_state().exit_code
    }

    /// Build, launch and run `tokens`, returning captured stdout.
    ///
    /// Both drainers are joined before the process exit is awaited, so the
    /// returned text is complete. On non-zero exit, signal death, forced kill
    /// or wait failure the error is [`CmdError::Runtime`] carrying the
    /// captured stderr.
    pub async fn run<S: AsRef<str>>(&self, tokens: &[S]) -> Result<String, CmdError> {
        self.claim()?;

        let argv = build_argv(
            tokens,
            self.config.platform,
            self.config.shell_wrap,
            self.config.cd_path(),
        );
        if argv.is_empty() {
            self.set_phase(Phase::Failed);
            return Err(CmdError::EmptyCommand);
        }

        if self.config.print_cmd {
            print_argv(&argv);
        }
        info!(cmd = %render_argv(&argv), "starting process");

        // Subscribe before anyone can observe `Launched` so no exit request
        // is missed.
        let mut cancel_rx = self.cancel_tx.subscribe();

        let Launched {
            mut child,
            stdin,
            stdout,
            stderr,
        } = match launch(&argv) {
            Ok(launched) => launched,
            Err(e) => {
                self.set_phase(Phase::Failed);
                return Err(e);
            }
        };

        *self.stdin.lock().await = StdinSlot::Open(stdin);
        self.set_phase(Phase::Launched);

        let out_task = spawn_drainer(stdout, self.drain_settings(StreamKind::Stdout));
        let err_task = spawn_drainer(stderr, self.drain_settings(StreamKind::Stderr));
        let aborts = [out_task.abort_handle(), err_task.abort_handle()];
        self.set_phase(Phase::Running);

        let barrier = async { tokio::join!(out_task, err_task) };
        tokio::pin!(barrier);

        let drained = tokio::select! {
            joined = &mut barrier => Some(joined),
            _ = cancelled(&mut cancel_rx) => None,
        };

        let mut killed = drained.is_none();
        let (stdout_text, stderr_text) = match drained {
            Some((out, err)) => (
                joined_text(out, StreamKind::Stdout),
                joined_text(err, StreamKind::Stderr),
            ),
            None => {
                kill(&mut child);
                match timeout(KILL_DRAIN_GRACE, &mut barrier).await {
                    Ok((out, err)) => (
                        joined_text(out, StreamKind::Stdout),
                        joined_text(err, StreamKind::Stderr),
                    ),
                    Err(_) => {
                        warn!("drainers still reading after kill; abandoning them");
                        for handle in &aborts {
                            handle.abort();
                        }
                        (String::new(), String::new())
                    }
                }
            }
        };

        let wait_res = if killed {
            child.wait().await
        } else {
            tokio::select! {
                res = child.wait() => res,
                _ = cancelled(&mut cancel_rx) => {
                    killed = true;
                    kill(&mut child);
                    child.wait().await
                }
            }
        };

        // The child is gone; nothing can read stdin any more.
        *self.stdin.lock().await = StdinSlot::Closed;

        let (result, exit_code) = match wait_res {
            Ok(status) => {
                info!(
                    exit_code = ?status.code(),
                    success = status.success(),
                    killed,
                    "process exited"
                );
                let failure = if killed {
                    Some(ExitFailure::Killed)
                } else if status.success() {
                    None
                } else if let Some(code) = status.code() {
                    Some(ExitFailure::Code(code))
                } else if let Some(sig) = terminating_signal(&status) {
                    Some(ExitFailure::Signal(sig))
                } else {
                    Some(ExitFailure::Code(-1))
                };
                (failure, status.code())
            }
            Err(e) => {
                warn!(error = %e, "waiting for process failed");
                (Some(ExitFailure::Wait(e.to_string())), None)
            }
        };

        {
            let mut state = self.lock_state();
            state.stdout_text = stdout_text.clone();
            state.stderr_text = stderr_text.clone();
            state.exit_code = exit_code;
        }

        match result {
            None => {
                self.set_phase(Phase::Completed);
                Ok(stdout_text)
            }
            Some(failure) => {
                self.set_phase(Phase::Failed);
                Err(CmdError::Runtime {
                    failure,
                    stderr: stderr_text,
                })
            }
        }
    }

    /// Write `line` plus a newline to the child's stdin.
    pub async fn input_text(&self, line: &str) -> Result<(), CmdError> {
        let mut slot = self.stdin.lock().await;
        match &mut *slot {
            StdinSlot::Open(stdin) => {
                let mut buf = String::with_capacity(line.len() + 1);
                buf.push_str(line);
                buf.push('\n');
                stdin.write_all(buf.as_bytes()).await?;
                stdin.flush().await?;
                Ok(())
            }
            StdinSlot::Closed if !self.phase().is_finished() => Err(CmdError::ClosedPipe),
            _ => Err(CmdError::NotRunning {
                phase: self.phase(),
            }),
        }
    }

    /// Close the child's stdin. Does not terminate the process.
    ///
    /// The first call succeeds; any later call returns
    /// [`CmdError::ClosedPipe`].
    pub async fn close(&self) -> Result<(), CmdError> {
        let mut slot = self.stdin.lock().await;
        match std::mem::replace(&mut *slot, StdinSlot::Closed) {
            StdinSlot::Open(mut stdin) => {
                if let Err(e) = stdin.flush().await {
                    debug!(error = %e, "flush before closing stdin failed");
                }
                drop(stdin);
                debug!("stdin closed");
                Ok(())
            }
            StdinSlot::Closed => Err(CmdError::ClosedPipe),
            StdinSlot::Pending => {
                *slot = StdinSlot::Pending;
                Err(CmdError::NotRunning {
                    phase: self.phase(),
                })
            }
        }
    }

    /// Force-kill the process and close stdin.
    ///
    /// Fire-and-forget: never waits on the child, the drainers or a pending
    /// `input_text`, and reports nothing. The pending `run` returns
    /// [`ExitFailure::Killed`]. Ignored unless the handle is launched or
    /// running.
    pub async fn exit(&self) {
        let phase = self.phase();
        if !matches!(phase, Phase::Launched | Phase::Running) {
            debug!(%phase, "exit requested on a handle that is not running; ignoring");
            return;
        }
        info!("exit requested; killing process");
        self.cancel_tx.send_replace(true);
        self.release_stdin();
    }

    /// Drop stdin if nobody is writing to it. A writer parked on a full pipe
    /// fails once the child is killed, and `run` closes the slot after that.
    fn release_stdin(&self) {
        match self.stdin.try_lock() {
            Ok(mut slot) => {
                if matches!(*slot, StdinSlot::Open(_)) {
                    *slot = StdinSlot::Closed;
                    debug!("stdin closed");
                }
            }
            Err(_) => debug!("stdin busy with a pending write; leaving it to the run"),
        }
    }

    fn claim(&self) -> Result<(), CmdError> {
        let mut state = self.lock_state();
        if state.used {
            return Err(CmdError::AlreadyUsed);
        }
        state.used = true;
        Ok(())
    }

    fn set_phase(&self, phase: Phase) {
        self.phase_tx.send_replace(phase);
    }

    fn lock_state(&self) -> MutexGuard<'_, HandleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn drain_settings(&self, stream: StreamKind) -> DrainSettings {
        let callback = match stream {
            StreamKind::Stdout => self.config.on_stdout.clone(),
            StreamKind::Stderr => self.config.on_stderr.clone(),
        };
        DrainSettings {
            stream,
            platform: self.config.platform,
            legacy_encoding: self.config.legacy_encoding,
            callback,
        }
    }
}

/// Resolves once an exit has been requested. Never resolves if the sender is
/// gone.
async fn cancelled(rx: &mut watch::Receiver<bool>) {
    if rx.wait_for(|requested| *requested).await.is_err() {
        std::future::pending::<()>().await;
    }
}

fn kill(child: &mut Child) {
    if let Err(e) = force_kill(child) {
        warn!(error = %e, "failed to kill child process");
    }
}

fn joined_text(res: Result<String, JoinError>, stream: StreamKind) -> String {
    res.unwrap_or_else(|e| {
        warn!(%stream, error = %e, "drainer task failed; its output is lost");
        String::new()
    })
}
