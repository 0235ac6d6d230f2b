//! Value types shared by the orchestrator and its I/O adapters.
//!
//! Nothing here touches the filesystem or spawns processes. A [`Task`] is
//! built once at startup and never mutated; a [`TaskResult`] lives only long
//! enough to be logged and judged.

use std::fmt;
use std::path::PathBuf;

use crate::exit_codes;

/// One external provisioning script and the arguments it is invoked with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Short label used in log records (e.g. `install`).
    pub name: String,
    /// Absolute path to the script.
    pub path: PathBuf,
    /// Arguments appended after the script path, in order.
    pub args: Vec<String>,
    /// Human description traced when the task starts.
    pub description: String,
}

impl Task {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            args: Vec::new(),
            description: String::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Exit code and captured text streams of one task invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TaskResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// The only failure kind: an external task exited non-zero.
///
/// Missing scripts, permission problems and script-internal errors all land
/// here indistinguishably.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    pub task: String,
    pub path: PathBuf,
    pub exit_code: i32,
    pub stderr: String,
    /// Set when the ERROR record for this failure could not be written.
    pub log_error: Option<String>,
}

impl TaskFailure {
    pub fn from_result(task: &Task, result: &TaskResult) -> Self {
        Self {
            task: task.name.clone(),
            path: task.path.clone(),
            exit_code: result.exit_code,
            stderr: result.stderr.clone(),
            log_error: None,
        }
    }
}

impl fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "task '{}' ({}) failed with exit code {}",
            self.task,
            self.path.display(),
            self.exit_code
        )
    }
}

/// Terminal state of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every task exited 0.
    Completed { tasks_run: usize },
    /// The first non-zero exit stopped the run; later tasks never started.
    Aborted(TaskFailure),
}

impl RunOutcome {
    /// Process exit code for this outcome: 0, or the failing task's code verbatim.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Completed { .. } => exit_codes::OK,
            RunOutcome::Aborted(failure) => failure.exit_code,
        }
    }
}
