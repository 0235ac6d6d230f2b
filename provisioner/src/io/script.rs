//! Script runner abstraction for task invocation.
//!
//! The [`TaskRunner`] trait decouples orchestration from process spawning.
//! Tests use scripted runners that return predetermined results without
//! spawning anything.

use std::process::Command;

use anyhow::Result;
use tracing::{debug, instrument};

use crate::core::types::{Task, TaskResult};
use crate::io::config::InterpreterConfig;
use crate::io::process::{UNKNOWN_EXIT_CODE, run_command_capture};

/// Abstraction over how a task's script is executed.
pub trait TaskRunner {
    /// Run the task to completion and report its exit code and captured streams.
    ///
    /// A task that cannot be started is still a `TaskResult` (non-zero exit
    /// code); `Err` is reserved for faults in the runner itself.
    fn run(&self, task: &Task) -> Result<TaskResult>;
}

/// Runs scripts through an interpreter, e.g. `pwsh -NoProfile -ExecutionPolicy Bypass -File`.
#[derive(Debug, Clone)]
pub struct ScriptRunner {
    interpreter: InterpreterConfig,
}

impl ScriptRunner {
    pub fn new(interpreter: InterpreterConfig) -> Self {
        Self { interpreter }
    }

    /// Build the full invocation: interpreter args, script path, then task args.
    pub fn command(&self, task: &Task) -> Command {
        let mut cmd = Command::new(&self.interpreter.program);
        cmd.args(&self.interpreter.args)
            .arg(&task.path)
            .args(&task.args);
        cmd
    }
}

impl TaskRunner for ScriptRunner {
    #[instrument(skip_all, fields(task = %task.name))]
    fn run(&self, task: &Task) -> Result<TaskResult> {
        match run_command_capture(self.command(task)) {
            Ok(output) => {
                debug!(exit_code = output.exit_code(), "script exited");
                Ok(TaskResult {
                    exit_code: output.exit_code(),
                    stdout: output.stdout_text(),
                    stderr: output.stderr_text(),
                })
            }
            Err(err) => {
                debug!(err = %err, program = %self.interpreter.program, "script could not be started");
                Ok(TaskResult {
                    exit_code: UNKNOWN_EXIT_CODE,
                    stdout: String::new(),
                    stderr: format!("{:#}: {}", err, self.interpreter.program),
                })
            }
        }
    }
}
