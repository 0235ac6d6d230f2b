//! Test-only helpers: scripted runners, task builders, stub script directories.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tempfile::TempDir;

use crate::core::plan::{BACKUP_SCRIPT, INSTALL_SCRIPT, UPDATE_CONFIG_SCRIPT};
use crate::core::types::{Task, TaskResult};
use crate::io::config::CONFIG_FILE_NAME;
use crate::io::run_log::{Record, RunLog, parse_records};
use crate::io::script::TaskRunner;

/// Create a task with a deterministic absolute-looking path and no arguments.
pub fn task(name: &str) -> Task {
    Task::new(name, Path::new("/opt/setup").join(format!("{name}.ps1")))
}

/// A successful result with the given stdout.
pub fn ok(stdout: &str) -> TaskResult {
    TaskResult {
        exit_code: 0,
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

/// A failed result with the given exit code and stderr.
pub fn failed(exit_code: i32, stderr: &str) -> TaskResult {
    TaskResult {
        exit_code,
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

/// Runner that returns queued results in order and remembers what it ran.
pub struct ScriptedRunner {
    results: RefCell<VecDeque<TaskResult>>,
    calls: RefCell<Vec<Task>>,
}

impl ScriptedRunner {
    pub fn new(results: Vec<TaskResult>) -> Self {
        Self {
            results: RefCell::new(results.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Tasks passed to `run`, in call order.
    pub fn calls(&self) -> Vec<Task> {
        self.calls.borrow().clone()
    }

    pub fn call_names(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|t| t.name.clone()).collect()
    }
}

impl TaskRunner for ScriptedRunner {
    fn run(&self, task: &Task) -> Result<TaskResult> {
        self.calls.borrow_mut().push(task.clone());
        self.results
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow!("no scripted result for task '{}'", task.name))
    }
}

/// Records written to an in-memory run log.
pub fn memory_records(log: &RunLog<Vec<u8>>) -> Vec<Record> {
    parse_records(&String::from_utf8_lossy(log.get_ref()))
}

/// Temporary directory laid out like a provisioning checkout, with `sh` stub scripts.
///
/// The directory's `provisioner.toml` points the interpreter at `sh`, so the
/// stubs can stand in for the real PowerShell scripts.
pub struct StubScripts {
    dir: TempDir,
}

impl StubScripts {
    /// Create stubs that all exit 0.
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create temp dir")?;
        let stubs = Self { dir };
        stubs.write_config("[interpreter]\nprogram = \"sh\"\nargs = []\n")?;
        for name in [UPDATE_CONFIG_SCRIPT, INSTALL_SCRIPT, BACKUP_SCRIPT] {
            stubs.write_script(name, "exit 0\n")?;
        }
        Ok(stubs)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn log_path(&self) -> PathBuf {
        self.path().join("controller.log")
    }

    /// Overwrite one stub script body.
    pub fn write_script(&self, name: &str, body: &str) -> Result<()> {
        let path = self.path().join(name);
        fs::write(&path, body).with_context(|| format!("write {}", path.display()))
    }

    pub fn write_config(&self, contents: &str) -> Result<()> {
        let path = self.path().join(CONFIG_FILE_NAME);
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))
    }

    /// Records in `controller.log`, or empty if no log was written.
    pub fn log_records(&self) -> Result<Vec<Record>> {
        let path = self.log_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let text =
            fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        Ok(parse_records(&text))
    }
}
