//! Ambient settings read from an optional `provisioner.toml`.
//!
//! The task list itself is not configurable; this file only says where the
//! run log goes and which interpreter runs the scripts.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Default config file name, looked up next to the scripts.
pub const CONFIG_FILE_NAME: &str = "provisioner.toml";

/// Default run log, relative to the working directory.
pub const DEFAULT_LOG_PATH: &str = "controller.log";

/// Provisioner configuration (TOML).
///
/// Missing fields default to the behaviour of running with no config at all.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProvisionerConfig {
    /// Where run log records are appended.
    pub log_path: PathBuf,

    pub interpreter: InterpreterConfig,
}

/// Program used to run each script non-interactively.
///
/// The script path and task arguments are appended after `args`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InterpreterConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        let program = if cfg!(windows) { "powershell.exe" } else { "pwsh" };
        Self {
            program: program.to_string(),
            args: ["-NoProfile", "-ExecutionPolicy", "Bypass", "-File"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Default for ProvisionerConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            interpreter: InterpreterConfig::default(),
        }
    }
}

impl ProvisionerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.log_path.as_os_str().is_empty() {
            return Err(anyhow!("log_path must not be empty"));
        }
        if self.interpreter.program.trim().is_empty() {
            return Err(anyhow!("interpreter.program must not be empty"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ProvisionerConfig::default()`.
pub fn load_config(path: &Path) -> Result<ProvisionerConfig> {
    if !path.exists() {
        let cfg = ProvisionerConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ProvisionerConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
