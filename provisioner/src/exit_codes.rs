//! Exit codes the provisioner produces on its own.
//!
//! A failed task is not listed here: its exit code is forwarded verbatim.

/// Every task succeeded.
pub const OK: i32 = 0;
/// The run could not be set up or the run log could not be written.
pub const INVALID: i32 = 1;
