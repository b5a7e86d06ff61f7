use serde::{Deserialize, Serialize};
use tracing::warn;

use super::lanes::LaneTable;
use super::Step;
use crate::topology::{Barrel, LaneId};
use crate::utils::map_indexed;

/// Fraction of the map duration each lane spent dead.
///
/// The interval between two consecutive keys is credited to the lanes of the
/// snapshot at the later key. Lane values are normalized by the full map
/// span; the `after_ramp` variant only counts intervals ending after the
/// ramp-up window and is normalized by the span minus that window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeadTime {
    pub per_lane: Vec<f64>,
    pub per_lane_after_ramp: Vec<f64>,
    /// Mean of `per_lane` over the lanes of each stave.
    pub per_stave: Vec<f64>,
    /// Mean of `per_lane` over the lanes of each layer.
    pub per_layer: Vec<f64>,
    pub inner_average: f64,
    pub outer_average: f64,
}

impl DeadTime {
    pub fn barrel_average(&self, barrel: Barrel) -> f64 {
        match barrel {
            Barrel::Inner => self.inner_average,
            Barrel::Outer => self.outer_average,
        }
    }

    pub fn lane(&self, lane: LaneId) -> Option<f64> {
        self.per_lane.get(lane.index()).copied()
    }
}

#[derive(Debug)]
pub(crate) struct DeadTimeAccumulator {
    ramp_up_s: f64,
    orbits: Vec<u64>,
    orbits_after_ramp: Vec<u64>,
}

impl DeadTimeAccumulator {
    pub(crate) fn new(n_lanes: usize, ramp_up_s: f64) -> Self {
        Self {
            ramp_up_s,
            orbits: vec![0; n_lanes],
            orbits_after_ramp: vec![0; n_lanes],
        }
    }

    pub(crate) fn observe(&mut self, step: &Step<'_>) {
        let after_ramp = step.time_s > self.ramp_up_s;
        for lane in step.lanes {
            self.orbits[lane.index()] += step.gap;
            if after_ramp {
                self.orbits_after_ramp[lane.index()] += step.gap;
            }
        }
    }

    pub(crate) fn finish(
        self,
        table: &LaneTable,
        n_staves: usize,
        n_layers: usize,
        span_s: f64,
        orbit_s: f64,
    ) -> DeadTime {
        if span_s <= 0.0 {
            warn!("map spans zero seconds, dead time reported as 0");
        }
        let ramp_up_s = self.ramp_up_s;
        let orbits = &self.orbits;
        let orbits_after_ramp = &self.orbits_after_ramp;

        let per_lane = map_indexed(orbits.len(), |lane| {
            if span_s > 0.0 {
                orbit_s * orbits[lane] as f64 / span_s
            } else {
                0.0
            }
        });
        let per_lane_after_ramp = map_indexed(orbits_after_ramp.len(), |lane| {
            if span_s > ramp_up_s {
                orbit_s * orbits_after_ramp[lane] as f64 / (span_s - ramp_up_s)
            } else {
                0.0
            }
        });

        let mut staves = MeanBuckets::new(n_staves);
        let mut layers = MeanBuckets::new(n_layers);
        let mut barrels = MeanBuckets::new(Barrel::ALL.len());
        for (index, &value) in per_lane.iter().enumerate() {
            let lane = LaneId(index as u16);
            staves.add(table.stave(lane), value);
            layers.add(table.layer(lane), value);
            barrels.add(table.barrel(lane).index(), value);
        }
        let barrels = barrels.means();

        DeadTime {
            per_lane,
            per_lane_after_ramp,
            per_stave: staves.means(),
            per_layer: layers.means(),
            inner_average: barrels[Barrel::Inner.index()],
            outer_average: barrels[Barrel::Outer.index()],
        }
    }
}

struct MeanBuckets {
    sums: Vec<f64>,
    counts: Vec<usize>,
}

impl MeanBuckets {
    fn new(len: usize) -> Self {
        Self {
            sums: vec![0.0; len],
            counts: vec![0; len],
        }
    }

    fn add(&mut self, bucket: usize, value: f64) {
        self.sums[bucket] += value;
        self.counts[bucket] += 1;
    }

    /// Empty buckets average to 0.
    fn means(self) -> Vec<f64> {
        self.sums
            .into_iter()
            .zip(self.counts)
            .map(|(sum, count)| if count > 0 { sum / count as f64 } else { 0.0 })
            .collect()
    }
}
