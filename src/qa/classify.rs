use serde::{Deserialize, Serialize};

use super::metric::MetricInput;
use super::report::QaReport;
use super::severity::Severity;
use super::thresholds::QaThresholds;

/// Stateless mapping from measured values to severities.
///
/// The classifier owns its threshold tables and the two gap cuts (nominal and
/// unanchorable, in orbits) that the compound gap check needs. Classifying the
/// same input twice always yields the same severity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classifier {
    pub thresholds: QaThresholds,
    pub nominal_gap: u64,
    pub unanchorable_gap: u64,
}

impl Classifier {
    pub fn new(thresholds: QaThresholds, nominal_gap: u64, unanchorable_gap: u64) -> Self {
        Self {
            thresholds,
            nominal_gap,
            unanchorable_gap,
        }
    }

    /// Classifies one measured value.
    pub fn classify(&self, input: &MetricInput) -> Severity {
        let t = &self.thresholds;
        match *input {
            MetricInput::MapSize {
                evolving,
                static_words,
            } => {
                if evolving == 0 {
                    Severity::Fatal
                } else if static_words == 0 {
                    Severity::Bad
                } else {
                    Severity::Good
                }
            }
            MetricInput::FullyDeadIb { dead_lanes } => t.fully_dead_ib.grade(dead_lanes as f64),
            MetricInput::FullyDeadOb {
                lanes_with_dead,
                total_lanes,
            } => t
                .fully_dead_ob
                .grade(ratio(lanes_with_dead as f64, total_lanes as f64)),
            MetricInput::OrbitGaps {
                max_gap,
                over_nominal,
                steps,
            } => {
                let gaps = &t.gaps;
                let max_gap = max_gap as f64;
                let over = over_nominal as f64;
                if max_gap > gaps.bad_gap_factor * self.unanchorable_gap as f64
                    || over > gaps.bad_step_fraction * steps as f64
                {
                    Severity::Bad
                } else if max_gap > self.nominal_gap as f64
                    && over_nominal > gaps.medium_over_nominal
                {
                    Severity::Medium
                } else {
                    Severity::Good
                }
            }
            MetricInput::UnanchorableFraction(fraction) => t.unanchorable_fraction.grade(fraction),
            MetricInput::AvgDeadTimeIb(dead_time) => t.dead_time_ib.grade(dead_time),
            MetricInput::AvgDeadTimeOb(dead_time) => t.dead_time_ob.grade(dead_time),
            MetricInput::OrbitRange { map_s, reference_s } => {
                let range = &t.orbit_range;
                if map_s > reference_s + range.excess_s {
                    Severity::Medium
                } else if map_s >= reference_s - range.good_deficit_s {
                    Severity::Good
                } else if map_s >= reference_s - range.medium_deficit_s {
                    Severity::Medium
                } else {
                    Severity::Bad
                }
            }
        }
    }

    /// Classifies `input` and records the verdict under its metric.
    pub fn evaluate(&self, input: &MetricInput, report: &mut QaReport) -> Severity {
        let severity = self.classify(input);
        report.record(input.metric(), severity);
        severity
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        f64::NAN
    }
}
