//! Boolean switches read from environment variables.

use std::ffi::OsStr;

/// Whether `val` counts as "on". Everything except the empty string,
/// "0", "off", "false" and "no" does.
pub fn is_truthy(val: &OsStr) -> bool {
    match val.to_str() {
        Some(s) => !matches!(s, "" | "0" | "off" | "false" | "no"),
        // non-UTF-8 content is still something that was set
        None => true,
    }
}

/// Whether the env var `name` is set to a truthy value.
pub fn env_switch(name: &str) -> bool {
    match std::env::var_os(name) {
        Some(v) => is_truthy(&v),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_is_truthy() {
        for (s, expected) in [
            ("", false),
            ("0", false),
            ("off", false),
            ("false", false),
            ("no", false),
            ("1", true),
            ("yes", true),
            ("on", true),
        ] {
            assert_eq!(is_truthy(OsStr::new(s)), expected, "for {s:?}");
        }
    }

    #[test]
    fn t_env_switch_unset() {
        assert!(!env_switch("SHTML_UTIL_TEST_SURELY_NOT_SET"));
    }
}
