//! Severity classification of derived metrics.
//!
//! Each measured value is mapped onto a [`Severity`] by fixed threshold
//! tables held in [`QaThresholds`]. Verdicts are collected in a [`QaReport`]
//! whose global verdict is the worst recorded severity.

mod classify;
mod metric;
mod report;
mod severity;
mod thresholds;

pub use classify::Classifier;
pub use metric::{Metric, MetricInput};
pub use report::QaReport;
pub use severity::Severity;
pub use thresholds::{Bands, DurationThresholds, GapThresholds, QaThresholds};

#[cfg(test)]
mod tests;
