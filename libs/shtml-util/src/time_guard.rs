//! # Timing of scopes

//! `TimeGuard` reports the time between its creation and its drop,
//! but only if enabled: via the `SHTML_TIME` env var, or
//! `enabled_set(true)` in the current thread.

use std::{cell::Cell, fmt::Debug, time::{Duration, Instant}};

use crate::env::env_switch;

thread_local!{
    pub static ENABLED: Cell<bool> = Cell::new(env_switch("SHTML_TIME"));
}

/// Enable or disable `TimeGuard` reporting for this thread.
pub fn enabled_set(on: bool) {
    ENABLED.with(|cell| cell.set(on))
}

pub fn enabled() -> bool {
    ENABLED.with(|cell| cell.get())
}

pub enum TimeGuard<S: Debug> {
    Disabled,
    Enabled {
        name: S,
        start: Instant
    },
}

impl<S: Debug> TimeGuard<S> {
    pub fn new(name: S) -> Self {
        if enabled() {
            TimeGuard::Enabled { name, start: Instant::now() }
        } else {
            TimeGuard::Disabled
        }
    }

    /// Time since creation, `None` if disabled.
    pub fn elapsed(&self) -> Option<Duration> {
        match self {
            TimeGuard::Disabled => None,
            TimeGuard::Enabled { start, .. } => Some(start.elapsed()),
        }
    }
}

impl<S: Debug> Drop for TimeGuard<S> {
    fn drop(&mut self) {
        if let TimeGuard::Enabled { name, start } = self {
            eprintln!("time {:?}: {:?}", name, start.elapsed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_disabled_and_enabled() {
        enabled_set(false);
        let g = TimeGuard::new("off");
        assert!(g.elapsed().is_none());
        enabled_set(true);
        let g = TimeGuard::new("on");
        assert!(g.elapsed().is_some());
        enabled_set(false);
    }
}
