//! Helpers for running child processes to completion with captured output.

use std::io::Read;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, instrument};

/// Exit code reported when a child ended without one (and not by a known signal).
pub const UNKNOWN_EXIT_CODE: i32 = 1;

/// Captured child process output.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }

    pub fn exit_code(&self) -> i32 {
        exit_code(self.status)
    }
}

/// Run a command until it exits, capturing stdout/stderr without risking pipe deadlocks.
///
/// Both streams are drained on reader threads while the child runs and are only
/// returned once it has exited. There is no timeout: a hung child blocks the caller.
#[instrument(skip_all, fields(program = ?cmd.get_program()))]
pub fn run_command_capture(mut cmd: Command) -> Result<CommandOutput> {
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

    debug!("spawning child process");
    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => {
            debug!(err = %e, "failed to spawn command");
            return Err(e).context("spawn command");
        }
    };

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr was not piped"))?;

    let stdout_handle = thread::spawn(move || read_stream(stdout));
    let stderr_handle = thread::spawn(move || read_stream(stderr));

    let status = child.wait().context("wait for command")?;

    let stdout = join_output(stdout_handle).context("join stdout")?;
    let stderr = join_output(stderr_handle).context("join stderr")?;

    debug!(exit_code = ?status.code(), "command finished");
    Ok(CommandOutput {
        status,
        stdout,
        stderr,
    })
}

/// Map an exit status to a single integer code.
///
/// On Unix a child killed by a signal reports `128 + signal`, matching shells.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    UNKNOWN_EXIT_CODE
}

fn join_output(handle: thread::JoinHandle<Result<Vec<u8>>>) -> Result<Vec<u8>> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => Err(anyhow!("output reader thread panicked")),
    }
}

fn read_stream<R: Read>(mut reader: R) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).context("read output")?;
    Ok(buf)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(script);
        cmd
    }

    #[test]
    fn captures_both_streams_and_exit_code() {
        let output = run_command_capture(sh("echo out; echo err >&2; exit 3")).expect("run");
        assert_eq!(output.exit_code(), 3);
        assert_eq!(output.stdout_text(), "out\n");
        assert_eq!(output.stderr_text(), "err\n");
    }

    /// Output larger than a pipe buffer must not deadlock the child.
    #[test]
    fn drains_large_output_on_both_streams() {
        let output = run_command_capture(sh(
            "i=0; while [ $i -lt 5000 ]; do echo xxxxxxxxxxxxxxxxxxxxxxxx; echo yyyyyyyyyyyyyyyyyyyyyyyy >&2; i=$((i+1)); done",
        ))
        .expect("run");
        assert!(output.status.success());
        assert_eq!(output.stdout.len(), 5000 * 25);
        assert_eq!(output.stderr.len(), 5000 * 25);
    }

    #[test]
    fn signal_termination_maps_to_128_plus_signal() {
        let output = run_command_capture(sh("kill -9 $$")).expect("run");
        assert_eq!(output.exit_code(), 128 + 9);
    }

    #[test]
    fn spawn_failure_is_an_error() {
        let err = run_command_capture(Command::new("/nonexistent/provisioner-test-binary"))
            .unwrap_err();
        assert!(err.to_string().contains("spawn command"));
    }
}
