//! Sequential runner for development-environment provisioning scripts.
//!
//! A fixed list of external scripts (configuration update, install, backup)
//! is run one after another; each outcome is recorded in `controller.log`
//! and the first non-zero exit stops the run. The crate is split into:
//!
//! - **[`core`]**: Task values and the fixed plan. No I/O.
//! - **[`io`]**: Process spawning, config loading, the run log sink.
//!
//! [`orchestrator`] sequences the tasks; the binary turns its
//! [`RunOutcome`](crate::core::types::RunOutcome) into a process exit code.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod orchestrator;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
