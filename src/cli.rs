// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::Platform;

/// Command-line arguments for `cmdrun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cmdrun",
    version,
    about = "Run shell command steps, capture their output, and stream it live.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to a task file (TOML). Required with `--task`.
    ///
    /// Default: `Cmdrun.toml` in the current working directory.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Run the named task from the task file instead of ad-hoc commands.
    #[arg(long, value_name = "NAME", conflicts_with = "commands")]
    pub task: Option<String>,

    /// Switch into this directory before the first step.
    #[arg(long, value_name = "DIR")]
    pub cd: Option<PathBuf>,

    /// On Windows, execute the first step directly instead of via `cmd.exe /C`.
    #[arg(long)]
    pub no_shell_wrap: bool,

    /// Build the command line for this platform family (windows, unix)
    /// instead of the host's. Mostly useful with `--dry-run`.
    #[arg(long, value_name = "FAMILY")]
    pub platform: Option<Platform>,

    /// Do not echo the built command line before running it.
    #[arg(long)]
    pub quiet: bool,

    /// Print output lines as they arrive instead of after the run.
    #[arg(long)]
    pub stream: bool,

    /// Forward this process's stdin to the child, line by line.
    #[arg(long)]
    pub stdin: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CMDRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the argument vector that would run, without running it.
    #[arg(long)]
    pub dry_run: bool,

    /// Command steps; each one is a full shell command.
    #[arg(value_name = "COMMAND")]
    pub commands: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
