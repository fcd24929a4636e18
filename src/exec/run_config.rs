// src/exec/run_config.rs

//! Per-handle run configuration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use encoding_rs::Encoding;

use crate::encoding::default_legacy_encoding;
use crate::types::Platform;

/// Callback invoked with every decoded line of one stream.
///
/// Runs on a blocking thread dedicated to that stream, in line order. A slow
/// callback delays only its own stream.
pub type LineCallback = Arc<dyn Fn(&str) + Send + Sync + 'static>;

/// Settings applied when a `ProcessHandle` runs.
///
/// Everything here is fixed at construction (or through
/// `ProcessHandle::config_mut` before the run); nothing is global.
#[derive(Clone)]
pub struct RunConfig {
    /// Echo the final argument vector before executing it.
    pub print_cmd: bool,
    /// Directory to switch into before the command steps run.
    pub cd_dir: Option<PathBuf>,
    /// Wrap the steps in `cmd.exe /C` (Windows only).
    pub shell_wrap: bool,
    /// Family the argument vector is built for.
    pub platform: Platform,
    /// Codepage assumed for non-UTF-8 output on Windows.
    pub legacy_encoding: &'static Encoding,
    pub on_stdout: Option<LineCallback>,
    pub on_stderr: Option<LineCallback>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            print_cmd: true,
            cd_dir: None,
            shell_wrap: true,
            platform: Platform::current(),
            legacy_encoding: default_legacy_encoding(),
            on_stdout: None,
            on_stderr: None,
        }
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("print_cmd", &self.print_cmd)
            .field("cd_dir", &self.cd_dir)
            .field("shell_wrap", &self.shell_wrap)
            .field("platform", &self.platform)
            .field("legacy_encoding", &self.legacy_encoding.name())
            .field("on_stdout", &self.on_stdout.is_some())
            .field("on_stderr", &self.on_stderr.is_some())
            .finish()
    }
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print_cmd(mut self, val: bool) -> Self {
        self.print_cmd = val;
        self
    }

    pub fn cd_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cd_dir = Some(dir.into());
        self
    }

    pub fn shell_wrap(mut self, val: bool) -> Self {
        self.shell_wrap = val;
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn legacy_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.legacy_encoding = encoding;
        self
    }

    pub fn on_stdout<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_stdout = Some(Arc::new(f));
        self
    }

    pub fn on_stderr<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_stderr = Some(Arc::new(f));
        self
    }

    pub fn cd_path(&self) -> Option<&Path> {
        self.cd_dir.as_deref()
    }
}
