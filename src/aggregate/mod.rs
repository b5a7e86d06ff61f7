//! Temporal aggregation of the evolving dead-lane map.
//!
//! [`Aggregator::run`] walks the snapshots once in key order and feeds every
//! accumulator from the same step: gap statistics, per-lane dead time, worst
//! snapshots per barrel, dead-fraction curves and the stave-recovery series.
//! The accumulators are owned by that single pass and only their finished
//! results leave it, collected in [`Aggregates`].
//!
//! Time is measured from the first key; orbit counts are converted to seconds
//! with the configured orbit period.

mod curves;
mod deadtime;
mod evolving;
mod gaps;
mod lanes;
mod recovery;
mod smoothing;
mod static_map;
mod worst;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::QaConfig;
use crate::topology::{Barrel, ElementId, LaneId, TimeKey, Topology, TopologyError};

pub use curves::DeadFractionCurves;
pub use deadtime::DeadTime;
pub use evolving::EvolvingMap;
pub use gaps::GapStats;
pub use recovery::StaveRecoverySeries;
pub use smoothing::{rolling_average, SmoothedSeries, SmoothingError};
pub use static_map::StaticMapSummary;
pub use worst::{WorstCases, WorstSnapshot};

use curves::CurveAccumulator;
use deadtime::DeadTimeAccumulator;
use gaps::GapAccumulator;
use lanes::LaneTable;
use recovery::RecoveryAccumulator;
use worst::WorstTracker;

/// Errors raised while aggregating.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregateError {
    #[error("evolving map holds no snapshot")]
    EmptyMap,
    #[error("{lane} in snapshot {key} is outside the detector")]
    LaneOutOfRange { lane: LaneId, key: TimeKey },
    #[error(transparent)]
    Topology(#[from] TopologyError),
    #[error(transparent)]
    Smoothing(#[from] SmoothingError),
}

pub type AggregateResult<T> = Result<T, AggregateError>;

/// One snapshot as seen by the accumulators.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Step<'a> {
    pub(crate) index: usize,
    pub(crate) key: TimeKey,
    /// Orbits since the previous key, 0 for the first snapshot.
    pub(crate) gap: u64,
    /// Seconds since the first key.
    pub(crate) time_s: f64,
    pub(crate) lanes: &'a BTreeSet<LaneId>,
}

/// Smoothed inner- and outer-barrel dead-fraction curves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmoothedCurves {
    pub inner: SmoothedSeries,
    pub outer: SmoothedSeries,
}

/// Everything derived from one aggregation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregates {
    pub first_key: TimeKey,
    pub last_key: TimeKey,
    pub steps: usize,
    /// Seconds between the first and the last key.
    pub span_s: f64,
    pub static_map: StaticMapSummary,
    pub gaps: GapStats,
    pub dead_time: DeadTime,
    pub worst: WorstCases,
    pub curves: DeadFractionCurves,
    pub smoothed: SmoothedCurves,
    pub recovery: StaveRecoverySeries,
    /// Dead lanes of the most recent snapshot.
    pub last_snapshot: BTreeSet<LaneId>,
}

impl Aggregates {
    /// Orbits between the first and the last key.
    pub fn span_orbits(&self) -> u64 {
        self.last_key - self.first_key
    }
}

/// Single forward pass over an [`EvolvingMap`].
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    topology: &'a Topology,
    config: &'a QaConfig,
}

impl<'a> Aggregator<'a> {
    pub fn new(topology: &'a Topology, config: &'a QaConfig) -> Self {
        Self { topology, config }
    }

    pub fn run(
        &self,
        static_elements: &BTreeSet<ElementId>,
        map: &EvolvingMap,
    ) -> AggregateResult<Aggregates> {
        let (first_key, last_key) = match (map.first_key(), map.last_key()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(AggregateError::EmptyMap),
        };
        let topology = self.topology;
        let config = self.config;
        let orbit_s = config.orbit_ns * 1.0e-9;
        let span_s = config.orbits_to_seconds(last_key - first_key);
        debug!(steps = map.len(), first_key, last_key, span_s, "aggregating evolving map");

        let table = LaneTable::new(topology)?;
        let static_map = StaticMapSummary::new(static_elements, topology)?;

        let barrel_lanes = Barrel::ALL.map(|barrel| topology.n_lanes_in_barrel(barrel));
        let layer_lanes: Vec<usize> = topology.layers().iter().map(|layer| layer.lanes()).collect();

        let mut gaps = GapAccumulator::new(config.nominal_gap, config.unanchorable_gap, orbit_s);
        let mut dead_time = DeadTimeAccumulator::new(table.len(), config.ramp_up_s);
        let mut worst = WorstTracker::new(span_s, config.ramp_up_s);
        let mut curves = CurveAccumulator::new(barrel_lanes, layer_lanes);
        let mut recovery = RecoveryAccumulator::new(topology);

        let mut previous = first_key;
        let mut dead_per_layer = vec![0usize; topology.n_layers()];
        for (index, (key, lanes)) in map.iter().enumerate() {
            let mut dead_per_barrel = [0usize; 2];
            dead_per_layer.iter_mut().for_each(|count| *count = 0);
            for &lane in lanes {
                if !table.contains(lane) {
                    return Err(AggregateError::LaneOutOfRange { lane, key });
                }
                dead_per_barrel[table.barrel(lane).index()] += 1;
                dead_per_layer[table.layer(lane)] += 1;
            }

            let step = Step {
                index,
                key,
                gap: key - previous,
                time_s: config.orbits_to_seconds(key - first_key),
                lanes,
            };
            gaps.observe(&step);
            dead_time.observe(&step);
            worst.observe(&step, dead_per_barrel);
            curves.observe(&step, dead_per_barrel, &dead_per_layer);
            recovery.observe(&step)?;
            previous = key;
        }

        let gaps = gaps.finish(last_key - first_key);
        let dead_time = dead_time.finish(
            &table,
            topology.n_staves(),
            topology.n_layers(),
            span_s,
            orbit_s,
        );
        let curves = curves.finish();
        let smoothing = config.smoothing;
        let smoothed = SmoothedCurves {
            inner: rolling_average(&curves.time_s, &curves.inner, smoothing.window_s, smoothing.every)?,
            outer: rolling_average(&curves.time_s, &curves.outer, smoothing.window_s, smoothing.every)?,
        };
        let last_snapshot = map
            .last_snapshot()
            .map(|(_, lanes)| lanes.clone())
            .unwrap_or_default();

        info!(
            max_gap = gaps.max_gap,
            over_nominal = gaps.over_nominal,
            unanchorable_fraction = gaps.unanchorable_fraction,
            dead_time_ib = dead_time.inner_average,
            dead_time_ob = dead_time.outer_average,
            "aggregation finished"
        );

        Ok(Aggregates {
            first_key,
            last_key,
            steps: map.len(),
            span_s,
            static_map,
            gaps,
            dead_time,
            worst: worst.finish(),
            curves,
            smoothed,
            recovery: recovery.finish(),
            last_snapshot,
        })
    }
}
