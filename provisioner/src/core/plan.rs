//! The fixed provisioning workload.

use std::path::Path;

use crate::core::types::Task;

pub const UPDATE_CONFIG_SCRIPT: &str = "0.0_Update-GitHubConf.ps1";
pub const INSTALL_SCRIPT: &str = "0.0_Install-GithubVSCodeFromConfigFile.ps1";
pub const BACKUP_SCRIPT: &str = "0.0_BackupRestore-VSCodeConfig.ps1";

/// Build the ordered task list with scripts resolved under `script_dir`.
///
/// Order matters: the install script reads the config the first task refreshes.
pub fn default_tasks(script_dir: &Path) -> Vec<Task> {
    vec![
        Task::new("update-config", script_dir.join(UPDATE_CONFIG_SCRIPT))
            .with_description("Updating configuration file with latest installer URLs"),
        Task::new("install", script_dir.join(INSTALL_SCRIPT)).with_description(
            "Installing Git, GitHub CLI, VSCode, and cloning repository",
        ),
        Task::new("backup", script_dir.join(BACKUP_SCRIPT))
            .with_args(["-operation", "backup"])
            .with_description("Backing up VSCode settings and extensions"),
    ]
}
