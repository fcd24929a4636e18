// src/lib.rs

//! `cmdrun`: run shell command steps as a child process, drain its stdout
//! and stderr concurrently, normalise their encoding, stream lines to
//! callbacks, and return the captured output.
//!
//! The library entry point is [`exec::ProcessHandle`]; [`run`] is the CLI
//! driver used by `main.rs`.

pub mod cli;
pub mod config;
pub mod encoding;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info};

use crate::cli::CliArgs;
use crate::config::{default_config_path, load_and_validate};
use crate::errors::CmdError;
use crate::exec::argv::print_argv;
use crate::exec::{ProcessHandle, RunConfig, build_argv};
use crate::types::Phase;

pub use crate::encoding::{normalize_text, normalize_text_with};
pub use crate::errors::{CmdrunError, ExitFailure};
pub use crate::exec::run_command;
pub use crate::types::{Platform, StreamKind};

/// High-level entry point used by `main.rs`. Returns the exit code.
///
/// This wires together:
/// - task file loading (with `--task`) or ad-hoc commands
/// - CLI overrides of the run settings
/// - stdin forwarding or closing
/// - Ctrl-C handling (forced exit of the child)
pub async fn run(args: CliArgs) -> Result<i32> {
    let (steps, mut run_cfg, stream) = resolve_job(&args)?;

    if let Some(dir) = &args.cd {
        run_cfg = run_cfg.cd_dir(dir.clone());
    }
    if args.no_shell_wrap {
        run_cfg = run_cfg.shell_wrap(false);
    }
    if let Some(platform) = args.platform {
        run_cfg = run_cfg.platform(platform);
    }
    if args.quiet {
        run_cfg = run_cfg.print_cmd(false);
    }
    let stream = stream || args.stream;

    if args.dry_run {
        let argv = build_argv(
            &steps,
            run_cfg.platform,
            run_cfg.shell_wrap,
            run_cfg.cd_path(),
        );
        print_argv(&argv);
        debug!("dry-run complete (no execution)");
        return Ok(0);
    }

    if stream {
        run_cfg = run_cfg
            .on_stdout(|line| println!("{line}"))
            .on_stderr(|line| eprintln!("{line}"));
    }

    let handle = Arc::new(ProcessHandle::new(run_cfg));

    // Ctrl-C → forced exit of the child.
    {
        let handle = Arc::clone(&handle);
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            handle.exit().await;
        });
    }

    // Feed or close the child's stdin once it is running.
    {
        let handle = Arc::clone(&handle);
        let forward = args.stdin;
        tokio::spawn(async move {
            if !matches!(handle.wait_started().await, Phase::Launched | Phase::Running) {
                return;
            }
            if forward {
                forward_stdin(&handle).await;
            }
            if let Err(e) = handle.close().await {
                debug!(error = %e, "closing child stdin");
            }
        });
    }

    match handle.run(&steps).await {
        Ok(stdout) => {
            if !stream {
                print!("{stdout}");
            }
            Ok(0)
        }
        Err(CmdError::Runtime { failure, stderr }) => {
            if !stream {
                eprint!("{stderr}");
            }
            error!(%failure, "command failed");
            Ok(failure.code().unwrap_or(1))
        }
        Err(e) => Err(e).context("running command"),
    }
}

/// Pick the steps and base settings from either `--task` or the positional
/// commands.
fn resolve_job(args: &CliArgs) -> Result<(Vec<String>, RunConfig, bool)> {
    if let Some(name) = &args.task {
        let path: PathBuf = args.config.clone().unwrap_or_else(default_config_path);
        let cfg = load_and_validate(&path)
            .with_context(|| format!("loading task file {}", path.display()))?;
        let task = cfg.task(name)?;
        info!(task = %name, steps = task.steps().len(), "running task from file");
        return Ok((task.steps().to_vec(), cfg.run_config_for(task), task.stream));
    }

    if args.commands.is_empty() {
        bail!("no command given; pass COMMAND arguments or --task NAME");
    }
    Ok((args.commands.clone(), RunConfig::new(), false))
}

async fn forward_stdin(handle: &ProcessHandle) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if let Err(e) = handle.input_text(&line).await {
                    debug!(error = %e, "child no longer accepts input");
                    return;
                }
            }
            Ok(None) => return,
            Err(e) => {
                debug!(error = %e, "reading our stdin failed");
                return;
            }
        }
    }
}
