use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::Step;
use crate::topology::{Barrel, StaveId, Topology, TopologyResult};

/// Staves turning fully dead between consecutive snapshots.
///
/// Entry `i` counts the staves fully dead at snapshot `i` that were not fully
/// dead at snapshot `i - 1`; entry 0 is always 0. `fully_dead` holds the
/// number of fully dead staves at each snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaveRecoverySeries {
    pub fully_dead: Vec<usize>,
    pub inner: Vec<usize>,
    pub outer: Vec<usize>,
    pub per_layer: Vec<Vec<usize>>,
}

impl StaveRecoverySeries {
    pub fn barrel(&self, barrel: Barrel) -> &[usize] {
        match barrel {
            Barrel::Inner => &self.inner,
            Barrel::Outer => &self.outer,
        }
    }

    /// Total staves that turned fully dead over the whole map.
    pub fn total_transitions(&self) -> usize {
        self.inner.iter().chain(&self.outer).sum()
    }
}

#[derive(Debug)]
pub(crate) struct RecoveryAccumulator<'t> {
    topology: &'t Topology,
    previous: BTreeSet<StaveId>,
    series: StaveRecoverySeries,
}

impl<'t> RecoveryAccumulator<'t> {
    pub(crate) fn new(topology: &'t Topology) -> Self {
        Self {
            topology,
            previous: BTreeSet::new(),
            series: StaveRecoverySeries {
                per_layer: vec![Vec::new(); topology.n_layers()],
                ..StaveRecoverySeries::default()
            },
        }
    }

    pub(crate) fn observe(&mut self, step: &Step<'_>) -> TopologyResult<()> {
        let current = self.topology.fully_dead_staves(step.lanes)?;
        let mut per_layer = vec![0usize; self.topology.n_layers()];
        let mut per_barrel = [0usize; 2];
        if step.index > 0 {
            for stave in current.difference(&self.previous) {
                let layer = self.topology.stave_to_layer(*stave)?;
                per_layer[layer.index()] += 1;
                per_barrel[self.topology.layer(layer)?.barrel.index()] += 1;
            }
        }

        let series = &mut self.series;
        series.fully_dead.push(current.len());
        series.inner.push(per_barrel[Barrel::Inner.index()]);
        series.outer.push(per_barrel[Barrel::Outer.index()]);
        for (curve, count) in series.per_layer.iter_mut().zip(per_layer) {
            curve.push(count);
        }
        self.previous = current;
        Ok(())
    }

    pub(crate) fn finish(self) -> StaveRecoverySeries {
        self.series
    }
}
