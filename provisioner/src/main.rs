//! Provision a development environment by running its setup scripts in order.
//!
//! Runs the configuration-update, install and backup scripts found next to
//! the executable, appends each outcome to `controller.log`, and exits with
//! the first failing script's exit code.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use provisioner::core::plan::default_tasks;
use provisioner::core::types::RunOutcome;
use provisioner::exit_codes;
use provisioner::io::config::{CONFIG_FILE_NAME, load_config};
use provisioner::io::run_log::RunLog;
use provisioner::io::script::ScriptRunner;
use provisioner::logging;
use provisioner::orchestrator::run_all;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "provisioner",
    version,
    about = "Run development-environment provisioning scripts in order"
)]
struct Cli {
    /// Directory holding the provisioning scripts [default: the executable's directory].
    #[arg(long)]
    script_dir: Option<PathBuf>,
    /// Settings file [default: <SCRIPT_DIR>/provisioner.toml].
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(outcome) => {
            if let RunOutcome::Aborted(failure) = &outcome
                && let Some(err) = &failure.log_error
            {
                eprintln!("{err}");
            }
            std::process::exit(outcome.exit_code());
        }
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run(cli: &Cli) -> Result<RunOutcome> {
    let script_dir = resolve_script_dir(cli.script_dir.as_deref())?;
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| script_dir.join(CONFIG_FILE_NAME));
    debug!(script_dir = %script_dir.display(), config = %config_path.display(), "resolved paths");

    let cfg = load_config(&config_path)?;
    let mut log = RunLog::append(&cfg.log_path)?;
    let runner = ScriptRunner::new(cfg.interpreter);
    let tasks = default_tasks(&script_dir);
    run_all(&runner, &mut log, &tasks)
}

/// Absolute script directory: the explicit one, or wherever this binary lives.
fn resolve_script_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return std::path::absolute(dir)
            .with_context(|| format!("resolve script dir {}", dir.display()));
    }
    let exe = std::env::current_exe().context("locate current executable")?;
    exe.parent()
        .map(Path::to_path_buf)
        .with_context(|| format!("executable has no parent dir {}", exe.display()))
}
