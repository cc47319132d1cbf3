//! Printing diagnostics to stderr.

//! `warn!` always prints, `trace!` only when tracing is switched on
//! (via the `SHTML_TRACE` env var or `set_trace`). Prefixing the
//! names with `no` compiles a call site out completely.

use std::{fmt,
          io::{BufWriter, Write},
          sync::atomic::{AtomicBool, Ordering}};

use lazy_static::lazy_static;

use crate::env::env_switch;

lazy_static!{
    static ref TRACE: AtomicBool = AtomicBool::new(env_switch("SHTML_TRACE"));
}

pub fn trace_enabled() -> bool {
    TRACE.load(Ordering::Relaxed)
}

/// Switch `trace!` output on or off for the whole process.
pub fn set_trace(on: bool) {
    TRACE.store(on, Ordering::Relaxed)
}

/// Write one diagnostics line. Errors writing to stderr are ignored,
/// there is nowhere left to report them.
pub fn emit(prefix: &str, msg: fmt::Arguments, file: &str, line: u32) {
    let mut outp = BufWriter::new(std::io::stderr().lock());
    let _ = write!(&mut outp, "{prefix}: ");
    let _ = outp.write_fmt(msg);
    let _ = writeln!(&mut outp, " at {file:?} line {line}");
    let _ = outp.flush();
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::warn::emit("W", format_args!($($arg)*), file!(), line!())
    }
}

#[macro_export]
macro_rules! nowarn {
    ($($arg:tt)*) => {
    }
}

#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        if $crate::warn::trace_enabled() {
            $crate::warn::emit("T", format_args!($($arg)*), file!(), line!())
        }
    }
}

#[macro_export]
macro_rules! notrace {
    ($($arg:tt)*) => {
    }
}
