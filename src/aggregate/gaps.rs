use serde::{Deserialize, Serialize};

use super::Step;

/// Spacing statistics between consecutive snapshot keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GapStats {
    /// Gaps in orbits, one per consecutive pair of keys.
    pub gaps_orbits: Vec<u64>,
    /// The same gaps in seconds.
    pub gaps_s: Vec<f64>,
    pub max_gap: u64,
    pub min_gap: u64,
    /// Gaps strictly above the nominal spacing.
    pub over_nominal: usize,
    /// Sum of the portions of gaps exceeding the unanchorable cut, in orbits.
    pub unanchorable_orbits: u64,
    /// `unanchorable_orbits` over the total key span, 0 for a zero span.
    pub unanchorable_fraction: f64,
    /// Population standard deviation of the gaps in orbits.
    pub std_dev: f64,
}

impl GapStats {
    /// Number of gaps, one fewer than the number of snapshots.
    pub fn steps(&self) -> usize {
        self.gaps_orbits.len()
    }

    pub fn mean(&self) -> f64 {
        if self.gaps_orbits.is_empty() {
            return 0.0;
        }
        self.gaps_orbits.iter().map(|&gap| gap as f64).sum::<f64>() / self.steps() as f64
    }
}

#[derive(Debug)]
pub(crate) struct GapAccumulator {
    nominal_gap: u64,
    unanchorable_gap: u64,
    orbit_s: f64,
    stats: GapStats,
}

impl GapAccumulator {
    pub(crate) fn new(nominal_gap: u64, unanchorable_gap: u64, orbit_s: f64) -> Self {
        Self {
            nominal_gap,
            unanchorable_gap,
            orbit_s,
            stats: GapStats::default(),
        }
    }

    pub(crate) fn observe(&mut self, step: &Step<'_>) {
        if step.index == 0 {
            return;
        }
        let gap = step.gap;
        let stats = &mut self.stats;
        stats.max_gap = stats.max_gap.max(gap);
        stats.min_gap = if stats.gaps_orbits.is_empty() {
            gap
        } else {
            stats.min_gap.min(gap)
        };
        if gap > self.nominal_gap {
            stats.over_nominal += 1;
        }
        if gap > self.unanchorable_gap {
            stats.unanchorable_orbits += gap - self.unanchorable_gap;
        }
        stats.gaps_orbits.push(gap);
        stats.gaps_s.push(gap as f64 * self.orbit_s);
    }

    pub(crate) fn finish(self, span: u64) -> GapStats {
        let mut stats = self.stats;
        stats.unanchorable_fraction = if span > 0 {
            stats.unanchorable_orbits as f64 / span as f64
        } else {
            0.0
        };
        if !stats.gaps_orbits.is_empty() {
            let mean = stats.mean();
            let variance = stats
                .gaps_orbits
                .iter()
                .map(|&gap| {
                    let delta = gap as f64 - mean;
                    delta * delta
                })
                .sum::<f64>()
                / stats.steps() as f64;
            stats.std_dev = variance.sqrt();
        }
        stats
    }
}
