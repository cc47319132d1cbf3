//! Utilities shared between the shtml crates: stderr diagnostics
//! and timing.

pub mod env;
pub mod warn;
pub mod time_guard;
