//! [`Sensitive`]: a wrapper that keeps secret values out of logs and debug output.

use std::fmt;

/// Placeholder written wherever a sensitive value would otherwise be printed.
pub const REDACTED: &str = "[REDACTED]";

/// Wraps a value that must never be logged or displayed.
///
/// `Debug` prints [`REDACTED`]; there is deliberately no `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    /// Wrap a secret value.
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Unwrap into the inner value. Callers must not log the result.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}
