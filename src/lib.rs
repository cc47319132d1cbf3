//! Sample pages built with `shtml`, used by the example and benchmark
//! binaries.

pub mod page;
pub mod table;
