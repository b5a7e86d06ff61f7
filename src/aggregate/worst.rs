use serde::{Deserialize, Serialize};

use super::Step;
use crate::topology::{Barrel, TimeKey};

/// Snapshot with the most dead lanes in one barrel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorstSnapshot {
    pub step: usize,
    pub key: TimeKey,
    pub dead_lanes: usize,
}

/// Worst snapshot per barrel, `None` when no snapshot was eligible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorstCases {
    pub inner: Option<WorstSnapshot>,
    pub outer: Option<WorstSnapshot>,
}

impl WorstCases {
    pub fn get(&self, barrel: Barrel) -> Option<WorstSnapshot> {
        match barrel {
            Barrel::Inner => self.inner,
            Barrel::Outer => self.outer,
        }
    }
}

/// Keeps the first snapshot reaching the highest dead-lane count.
///
/// Snapshots inside the ramp-up window are skipped unless the whole map is
/// shorter than that window.
#[derive(Debug)]
pub(crate) struct WorstTracker {
    ramp_up_s: f64,
    whole_map_eligible: bool,
    cases: WorstCases,
}

impl WorstTracker {
    pub(crate) fn new(span_s: f64, ramp_up_s: f64) -> Self {
        Self {
            ramp_up_s,
            whole_map_eligible: span_s < ramp_up_s,
            cases: WorstCases::default(),
        }
    }

    pub(crate) fn observe(&mut self, step: &Step<'_>, dead_per_barrel: [usize; 2]) {
        if !self.whole_map_eligible && step.time_s <= self.ramp_up_s {
            return;
        }
        let candidates = [
            (&mut self.cases.inner, dead_per_barrel[Barrel::Inner.index()]),
            (&mut self.cases.outer, dead_per_barrel[Barrel::Outer.index()]),
        ];
        for (slot, dead_lanes) in candidates {
            if slot.map_or(true, |worst| dead_lanes > worst.dead_lanes) {
                *slot = Some(WorstSnapshot {
                    step: step.index,
                    key: step.key,
                    dead_lanes,
                });
            }
        }
    }

    pub(crate) fn finish(self) -> WorstCases {
        self.cases
    }
}
