// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::errors::{CmdrunError, Result};
use crate::exec::RunConfig;
use crate::types::Platform;

/// Top-level task file as read from TOML, before validation.
///
/// ```toml
/// [config]
/// print_cmd = true
/// cd = "workspace"
///
/// [task.build]
/// cmd = ["cargo build", "cargo test"]
/// stream = true
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    /// Keys are task names.
    #[serde(default)]
    pub task: BTreeMap<String, TaskConfig>,
}

/// Validated task file.
///
/// Only constructible through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub task: BTreeMap<String, TaskConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        task: BTreeMap<String, TaskConfig>,
    ) -> Self {
        Self { config, task }
    }

    pub fn task(&self, name: &str) -> Result<&TaskConfig> {
        self.task
            .get(name)
            .ok_or_else(|| CmdrunError::TaskNotFound(name.to_string()))
    }

    /// Run settings for `task`: task values override `[config]`.
    ///
    /// Callbacks are left unset; wiring output is up to the caller.
    pub fn run_config_for(&self, task: &TaskConfig) -> RunConfig {
        let mut cfg = RunConfig::new()
            .print_cmd(task.print_cmd.unwrap_or(self.config.print_cmd))
            .shell_wrap(task.shell_wrap.unwrap_or(self.config.shell_wrap));

        if let Some(platform) = self.config.platform {
            cfg = cfg.platform(platform);
        }
        if let Some(dir) = task.cd.as_ref().or(self.config.cd.as_ref()) {
            cfg = cfg.cd_dir(dir.clone());
        }
        cfg
    }
}

/// `[config]` section: defaults for every task.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    #[serde(default = "default_true")]
    pub print_cmd: bool,

    #[serde(default = "default_true")]
    pub shell_wrap: bool,

    /// Directory every task switches into unless it sets its own.
    #[serde(default)]
    pub cd: Option<PathBuf>,

    /// Force a platform family instead of the host's.
    #[serde(default)]
    pub platform: Option<Platform>,
}

fn default_true() -> bool {
    true
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            print_cmd: true,
            shell_wrap: true,
            cd: None,
            platform: None,
        }
    }
}

/// `cmd` accepts a single string or a list of steps.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum CommandList {
    One(String),
    Many(Vec<String>),
}

impl CommandList {
    pub fn steps(&self) -> &[String] {
        match self {
            CommandList::One(s) => std::slice::from_ref(s),
            CommandList::Many(v) => v,
        }
    }
}

/// `[task.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    /// Steps to run, in order; each runs only if the previous one succeeded
    /// (on Unix) or unconditionally (on Windows `&`).
    pub cmd: CommandList,

    #[serde(default)]
    pub cd: Option<PathBuf>,

    #[serde(default)]
    pub print_cmd: Option<bool>,

    #[serde(default)]
    pub shell_wrap: Option<bool>,

    /// Echo output lines while the task runs.
    #[serde(default)]
    pub stream: bool,
}

impl TaskConfig {
    pub fn steps(&self) -> &[String] {
        self.cmd.steps()
    }
}
