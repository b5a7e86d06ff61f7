use core::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of one quality check, ordered from best to worst.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    #[default]
    Good,
    Medium,
    Bad,
    Fatal,
}

impl Severity {
    /// Worst severity of an iterator, `Good` when empty.
    pub fn worst<I>(severities: I) -> Severity
    where
        I: IntoIterator<Item = Severity>,
    {
        severities.into_iter().max().unwrap_or_default()
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Good => "GOOD",
            Severity::Medium => "MEDIUM",
            Severity::Bad => "BAD",
            Severity::Fatal => "FATAL",
        }
    }

    /// Log level prefix used when the global verdict is printed.
    pub const fn log_label(self) -> &'static str {
        match self {
            Severity::Good => "INFO",
            Severity::Medium => "WARNING",
            Severity::Bad => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
