//! Pure types and the fixed task plan.
//!
//! Core modules must be free of I/O side effects.

pub mod plan;
pub mod types;
