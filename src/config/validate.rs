// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{CmdrunError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = CmdrunError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.task))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_tasks(cfg)?;
    validate_task_commands(cfg)?;
    Ok(())
}

fn ensure_has_tasks(cfg: &RawConfigFile) -> Result<()> {
    if cfg.task.is_empty() {
        return Err(CmdrunError::ConfigError(
            "config must contain at least one [task.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_task_commands(cfg: &RawConfigFile) -> Result<()> {
    for (name, task) in cfg.task.iter() {
        let steps = task.steps();
        if steps.is_empty() {
            return Err(CmdrunError::ConfigError(format!(
                "task '{}' has an empty `cmd`",
                name
            )));
        }
        if let Some(idx) = steps.iter().position(|s| s.trim().is_empty()) {
            return Err(CmdrunError::ConfigError(format!(
                "task '{}' has a blank step at `cmd[{}]`",
                name, idx
            )));
        }
    }
    Ok(())
}
