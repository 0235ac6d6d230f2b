//! Sequencing of provisioning tasks with stop-on-first-failure.
//!
//! Both functions are stateless: everything they remember lives in the run
//! log they are handed. Translating an outcome into a process exit code is
//! left to the binary.

use std::io::Write;

use anyhow::{Error, Result};
use tracing::{debug, info, instrument};

use crate::core::types::{RunOutcome, Task, TaskFailure, TaskResult};
use crate::io::run_log::RunLog;
use crate::io::script::TaskRunner;

pub const COMPLETED_MESSAGE: &str = "Environment setup completed successfully.";

/// Run one task and record its outcome in the run log.
///
/// Success writes one INFO record (with any stdout the script printed);
/// a non-zero exit writes one ERROR record carrying the exit code and stderr.
/// The caller decides what a failure means for the rest of the run.
pub fn run_task<R: TaskRunner, W: Write>(
    runner: &R,
    log: &mut RunLog<W>,
    task: &Task,
) -> Result<TaskResult> {
    let (result, log_error) = run_and_record(runner, log, task)?;
    match log_error {
        Some(err) => Err(err),
        None => Ok(result),
    }
}

/// Run `tasks` strictly in order until one fails or all succeed.
///
/// Tasks after the first failure are never started. The completion record is
/// written only when every task exited 0. If the ERROR record for the failing
/// task cannot be written, the run is still `Aborted` with that task's exit
/// code and the write error is kept on the failure.
#[instrument(skip_all, fields(tasks = tasks.len()))]
pub fn run_all<R: TaskRunner, W: Write>(
    runner: &R,
    log: &mut RunLog<W>,
    tasks: &[Task],
) -> Result<RunOutcome> {
    for task in tasks {
        let (result, log_error) = run_and_record(runner, log, task)?;
        if !result.success() {
            let mut failure = TaskFailure::from_result(task, &result);
            failure.log_error = log_error.map(|err| format!("{err:#}"));
            debug!(%failure, "aborting run");
            return Ok(RunOutcome::Aborted(failure));
        }
    }

    log.info(COMPLETED_MESSAGE)?;
    info!("run completed");
    Ok(RunOutcome::Completed {
        tasks_run: tasks.len(),
    })
}

/// Run a task and write its record.
///
/// A failed INFO write is an `Err`; a failed ERROR write is handed back next to
/// the result so the task's exit code is not lost.
#[instrument(skip_all, fields(task = %task.name))]
fn run_and_record<R: TaskRunner, W: Write>(
    runner: &R,
    log: &mut RunLog<W>,
    task: &Task,
) -> Result<(TaskResult, Option<Error>)> {
    if task.description.is_empty() {
        info!(path = %task.path.display(), "starting task");
    } else {
        info!(path = %task.path.display(), "{}", task.description);
    }

    let result = runner.run(task)?;

    if result.success() {
        let header = format!(
            "Task '{}' ({}) executed successfully.",
            task.name,
            task.path.display()
        );
        log.info(&with_payload(header, &result.stdout))?;
        return Ok((result, None));
    }

    debug!(exit_code = result.exit_code, "task failed");
    let header = format!(
        "Task '{}' ({}) failed with exit code {}.",
        task.name,
        task.path.display(),
        result.exit_code
    );
    let log_error = log.error(&with_payload(header, &result.stderr)).err();
    Ok((result, log_error))
}

fn with_payload(mut header: String, payload: &str) -> String {
    let payload = payload.trim_end();
    if !payload.trim().is_empty() {
        header.push('\n');
        header.push_str(payload);
    }
    header
}
