use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::metric::Metric;
use super::severity::Severity;

/// Per-metric verdicts collected during one run.
///
/// Entries are only ever added or raised: recording a metric twice keeps the
/// worse of the two severities. Metrics that could not be computed are kept
/// apart with the reason and do not affect the global verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaReport {
    checks: BTreeMap<Metric, Severity>,
    #[serde(default)]
    unavailable: BTreeMap<Metric, String>,
}

impl QaReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `severity` for `metric`, keeping the worse of any earlier entry.
    pub fn record(&mut self, metric: Metric, severity: Severity) {
        self.checks
            .entry(metric)
            .and_modify(|current| *current = (*current).max(severity))
            .or_insert(severity);
    }

    /// Notes that `metric` could not be computed.
    pub fn mark_unavailable(&mut self, metric: Metric, reason: impl Into<String>) {
        self.unavailable.insert(metric, reason.into());
    }

    pub fn severity(&self, metric: Metric) -> Option<Severity> {
        self.checks.get(&metric).copied()
    }

    pub fn unavailable_reason(&self, metric: Metric) -> Option<&str> {
        self.unavailable.get(&metric).map(String::as_str)
    }

    /// Recorded verdicts in metric order.
    pub fn checks(&self) -> impl Iterator<Item = (Metric, Severity)> + '_ {
        self.checks.iter().map(|(metric, severity)| (*metric, *severity))
    }

    pub fn unavailable(&self) -> impl Iterator<Item = (Metric, &str)> + '_ {
        self.unavailable
            .iter()
            .map(|(metric, reason)| (*metric, reason.as_str()))
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Worst recorded severity, `Good` for an empty report.
    pub fn global_verdict(&self) -> Severity {
        Severity::worst(self.checks.values().copied())
    }

    pub fn is_fatal(&self) -> bool {
        self.global_verdict() == Severity::Fatal
    }

    /// Human-readable summary with one line per check and the global verdict.
    pub fn summary(&self) -> String {
        let mut out = String::from("QA SUMMARY\n");
        for (metric, severity) in self.checks() {
            let _ = writeln!(out, "QA CHECK - {metric}: {severity}");
        }
        for (metric, reason) in self.unavailable() {
            let _ = writeln!(out, "QA UNAVAILABLE - {metric}: {reason}");
        }
        let verdict = self.global_verdict();
        let _ = write!(
            out,
            "{} - Global quality is {}",
            verdict.log_label(),
            verdict
        );
        out
    }
}
