//! CLI tests for the `provisioner` binary.
//!
//! Spawns the binary against stub scripts run by `sh` and verifies exit codes
//! and `controller.log` contents.
#![cfg(unix)]

use std::process::Command;

use provisioner::core::plan::{BACKUP_SCRIPT, INSTALL_SCRIPT, UPDATE_CONFIG_SCRIPT};
use provisioner::exit_codes;
use provisioner::io::run_log::Level;
use provisioner::orchestrator::COMPLETED_MESSAGE;
use provisioner::test_support::StubScripts;

fn provisioner(stubs: &StubScripts) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_provisioner"));
    cmd.current_dir(stubs.path())
        .arg("--script-dir")
        .arg(stubs.path())
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn all_scripts_succeed_exits_zero() {
    let stubs = StubScripts::new().expect("stubs");

    let status = provisioner(&stubs).status().expect("run provisioner");
    assert_eq!(status.code(), Some(exit_codes::OK));

    let records = stubs.log_records().expect("log");
    assert_eq!(records.len(), 4);
    assert!(records.iter().all(|r| r.level == Level::Info));
    assert_eq!(records[3].message, COMPLETED_MESSAGE);
}

#[test]
fn failing_install_forwards_exit_code_and_skips_backup() {
    let stubs = StubScripts::new().expect("stubs");
    stubs
        .write_script(INSTALL_SCRIPT, "echo 'network unreachable' >&2\nexit 1\n")
        .expect("install stub");
    stubs
        .write_script(BACKUP_SCRIPT, "touch backup-ran\nexit 0\n")
        .expect("backup stub");

    let status = provisioner(&stubs).status().expect("run provisioner");
    assert_eq!(status.code(), Some(1));
    assert!(!stubs.path().join("backup-ran").exists());

    let records = stubs.log_records().expect("log");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].level, Level::Info);
    assert_eq!(records[1].level, Level::Error);
    assert!(records[1].message.contains("exit code 1"));
    assert!(records[1].message.contains("network unreachable"));
}

#[test]
fn failing_run_writes_nothing_to_stderr() {
    let stubs = StubScripts::new().expect("stubs");
    stubs
        .write_script(INSTALL_SCRIPT, "echo 'network unreachable' >&2\nexit 1\n")
        .expect("install stub");

    let output = provisioner(&stubs).output().expect("run provisioner");
    assert_eq!(output.status.code(), Some(1));
    assert!(
        output.stderr.is_empty(),
        "unexpected stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let records = stubs.log_records().expect("log");
    assert_eq!(records[1].level, Level::Error);
    assert!(records[1].message.contains("network unreachable"));
}

#[test]
fn header_shaped_script_output_does_not_forge_records() {
    let stubs = StubScripts::new().expect("stubs");
    stubs
        .write_script(
            UPDATE_CONFIG_SCRIPT,
            "echo '2026-10-19 08:15:02,417 ERROR: fake'\n",
        )
        .expect("update stub");

    let status = provisioner(&stubs).status().expect("run provisioner");
    assert_eq!(status.code(), Some(exit_codes::OK));

    let records = stubs.log_records().expect("log");
    assert_eq!(records.len(), 4);
    assert!(records.iter().all(|r| r.level == Level::Info));
    assert!(records[0].message.contains("ERROR: fake"));
}

#[test]
fn backup_receives_operation_argument() {
    let stubs = StubScripts::new().expect("stubs");
    stubs
        .write_script(BACKUP_SCRIPT, "echo \"backup args: $*\"\n")
        .expect("backup stub");

    let status = provisioner(&stubs).status().expect("run provisioner");
    assert_eq!(status.code(), Some(exit_codes::OK));

    let records = stubs.log_records().expect("log");
    assert!(records[2].message.contains("backup args: -operation backup"));
}

#[test]
fn scripts_run_in_order_and_share_the_filesystem() {
    let stubs = StubScripts::new().expect("stubs");
    stubs
        .write_script(UPDATE_CONFIG_SCRIPT, "echo urls > config.txt\n")
        .expect("update stub");
    stubs
        .write_script(INSTALL_SCRIPT, "test -f config.txt || exit 9\n")
        .expect("install stub");

    let status = provisioner(&stubs).status().expect("run provisioner");
    assert_eq!(status.code(), Some(exit_codes::OK));
}

#[test]
fn missing_script_fails_the_run() {
    let stubs = StubScripts::new().expect("stubs");
    std::fs::remove_file(stubs.path().join(UPDATE_CONFIG_SCRIPT)).expect("remove");

    let status = provisioner(&stubs).status().expect("run provisioner");
    let code = status.code().expect("exit code");
    assert_ne!(code, 0);

    let records = stubs.log_records().expect("log");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, Level::Error);
    assert!(records[0].message.contains("'update-config'"));
}

#[test]
fn log_is_appended_across_runs() {
    let stubs = StubScripts::new().expect("stubs");

    provisioner(&stubs).status().expect("first run");
    provisioner(&stubs).status().expect("second run");

    let records = stubs.log_records().expect("log");
    assert_eq!(records.len(), 8);
}

#[test]
fn invalid_config_exits_invalid_without_running_scripts() {
    let stubs = StubScripts::new().expect("stubs");
    stubs
        .write_config("[interpreter]\nprogram = \"\"\n")
        .expect("config");
    stubs
        .write_script(UPDATE_CONFIG_SCRIPT, "touch update-ran\n")
        .expect("update stub");

    let output = provisioner(&stubs).output().expect("run provisioner");
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(String::from_utf8_lossy(&output.stderr).contains("interpreter.program"));
    assert!(!stubs.path().join("update-ran").exists());
}
