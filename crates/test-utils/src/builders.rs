#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use cmdrun::config::{CommandList, ConfigFile, ConfigSection, RawConfigFile, TaskConfig};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                task: BTreeMap::new(),
            },
        }
    }

    pub fn with_task(mut self, name: &str, task: TaskConfig) -> Self {
        self.config.task.insert(name.to_string(), task);
        self
    }

    pub fn with_default_cd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.config.cd = Some(dir.into());
        self
    }

    pub fn with_default_print_cmd(mut self, val: bool) -> Self {
        self.config.config.print_cmd = val;
        self
    }

    pub fn with_default_shell_wrap(mut self, val: bool) -> Self {
        self.config.config.shell_wrap = val;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskConfig`.
pub struct TaskConfigBuilder {
    task: TaskConfig,
}

impl TaskConfigBuilder {
    pub fn new(cmd: &str) -> Self {
        Self {
            task: TaskConfig {
                cmd: CommandList::Many(vec![cmd.to_string()]),
                cd: None,
                print_cmd: None,
                shell_wrap: None,
                stream: false,
            },
        }
    }

    pub fn then(mut self, cmd: &str) -> Self {
        let mut steps = self.task.cmd.steps().to_vec();
        steps.push(cmd.to_string());
        self.task.cmd = CommandList::Many(steps);
        self
    }

    pub fn cd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.task.cd = Some(dir.into());
        self
    }

    pub fn print_cmd(mut self, val: bool) -> Self {
        self.task.print_cmd = Some(val);
        self
    }

    pub fn shell_wrap(mut self, val: bool) -> Self {
        self.task.shell_wrap = Some(val);
        self
    }

    pub fn stream(mut self, val: bool) -> Self {
        self.task.stream = val;
        self
    }

    pub fn build(self) -> TaskConfig {
        self.task
    }
}
