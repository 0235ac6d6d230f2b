//! I/O helpers for the provisioner.

pub mod config;
pub mod process;
pub mod run_log;
pub mod script;
