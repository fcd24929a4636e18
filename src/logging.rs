// src/logging.rs

//! Logging setup for `cmdrun` using `tracing` + `tracing-subscriber`.
//!
//! The filter comes from, in order:
//! 1. `--log-level` (applies to every target)
//! 2. `CMDRUN_LOG`, read as an `EnvFilter` directive list such as
//!    `debug` or `cmdrun::exec=trace,warn`
//! 3. `warn`
//!
//! Logs go to STDERR; stdout carries command output only.

use anyhow::Result;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "CMDRUN_LOG";

const DEFAULT_LEVEL: LevelFilter = LevelFilter::WARN;

/// Initialise the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV).ok();
    let filter = build_filter(cli_level, env.as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing tracing subscriber: {e}"))?;

    Ok(())
}

/// Resolve the filter from the CLI level and the raw `CMDRUN_LOG` value.
///
/// Blank or unparsable directives fall back to the default level.
pub fn build_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> EnvFilter {
    if let Some(level) = cli_level {
        return level_filter(LevelFilter::from(level));
    }

    match env.map(str::trim).filter(|s| !s.is_empty()) {
        Some(directives) => EnvFilter::try_new(directives).unwrap_or_else(|e| {
            eprintln!("cmdrun: ignoring invalid {LOG_ENV}={directives:?}: {e}");
            default_filter()
        }),
        None => default_filter(),
    }
}

fn default_filter() -> EnvFilter {
    level_filter(DEFAULT_LEVEL)
}

/// A filter that applies `level` to every target.
fn level_filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::new(level.to_string().to_lowercase())
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}
