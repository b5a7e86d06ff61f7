use serde::{Deserialize, Serialize};

use super::severity::Severity;

/// Two cut points splitting a value axis into GOOD, MEDIUM and BAD.
///
/// Values strictly below `good_below` are GOOD, values strictly below
/// `medium_below` are MEDIUM, everything else (NaN included) is BAD. Setting
/// both cuts equal removes the MEDIUM band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bands {
    pub good_below: f64,
    pub medium_below: f64,
}

impl Bands {
    pub const fn new(good_below: f64, medium_below: f64) -> Self {
        Self {
            good_below,
            medium_below,
        }
    }

    pub fn grade(&self, value: f64) -> Severity {
        if value < self.good_below {
            Severity::Good
        } else if value < self.medium_below {
            Severity::Medium
        } else {
            Severity::Bad
        }
    }

    /// Like [`Bands::grade`] but with the cut points themselves included.
    pub fn grade_inclusive(&self, value: f64) -> Severity {
        if value <= self.good_below {
            Severity::Good
        } else if value <= self.medium_below {
            Severity::Medium
        } else {
            Severity::Bad
        }
    }

    /// Both cuts are finite and ordered.
    pub fn is_well_formed(&self) -> bool {
        self.good_below.is_finite()
            && self.medium_below.is_finite()
            && self.good_below <= self.medium_below
    }
}

/// Compound cuts for the orbit-gap check.
///
/// | Verdict | Condition |
/// |---------|-----------|
/// | BAD | `max_gap > bad_gap_factor * unanchorable` or `over_nominal > bad_step_fraction * steps` |
/// | MEDIUM | `max_gap > nominal` and `over_nominal > medium_over_nominal` |
/// | GOOD | otherwise |
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapThresholds {
    pub bad_gap_factor: f64,
    pub bad_step_fraction: f64,
    pub medium_over_nominal: usize,
}

/// Tolerances, in seconds, for the map duration against the reference run.
///
/// | Verdict | Condition |
/// |---------|-----------|
/// | MEDIUM | `map > reference + excess_s` |
/// | GOOD | `map >= reference - good_deficit_s` |
/// | MEDIUM | `map >= reference - medium_deficit_s` |
/// | BAD | otherwise |
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationThresholds {
    pub excess_s: f64,
    pub good_deficit_s: f64,
    pub medium_deficit_s: f64,
}

/// Threshold tables of every classified metric.
///
/// | Field | GOOD below | MEDIUM below |
/// |-------|------------|--------------|
/// | `fully_dead_ib` (lanes) | 9 | 43.2 (10% of the inner barrel) |
/// | `fully_dead_ob` (fraction of all lanes) | 0.02 | 0.02 |
/// | `unanchorable_fraction` | 0.02 | 0.05 |
/// | `dead_time_ib` | 0.03 | 0.10 |
/// | `dead_time_ob` | 0.05 | 0.10 |
/// | `lookup_duration` (absolute difference, s, inclusive) | 5 | 60 |
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QaThresholds {
    pub fully_dead_ib: Bands,
    pub fully_dead_ob: Bands,
    pub unanchorable_fraction: Bands,
    pub dead_time_ib: Bands,
    pub dead_time_ob: Bands,
    pub gaps: GapThresholds,
    pub orbit_range: DurationThresholds,
    pub lookup_duration: Bands,
}

impl Default for QaThresholds {
    fn default() -> Self {
        Self {
            fully_dead_ib: Bands::new(9.0, 43.2),
            fully_dead_ob: Bands::new(0.02, 0.02),
            unanchorable_fraction: Bands::new(0.02, 0.05),
            dead_time_ib: Bands::new(0.03, 0.10),
            dead_time_ob: Bands::new(0.05, 0.10),
            gaps: GapThresholds {
                bad_gap_factor: 2.0,
                bad_step_fraction: 0.25,
                medium_over_nominal: 2,
            },
            orbit_range: DurationThresholds {
                excess_s: 5.0,
                good_deficit_s: 5.0,
                medium_deficit_s: 30.0,
            },
            lookup_duration: Bands::new(5.0, 60.0),
        }
    }
}
