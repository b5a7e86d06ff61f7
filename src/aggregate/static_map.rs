use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::topology::{Barrel, ElementId, LaneId, Topology, TopologyResult};

/// Per-lane view of the static dead-chip set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticMapSummary {
    /// Dead chips on each lane.
    pub dead_per_lane: Vec<u16>,
    pub dead_elements: usize,
    /// Inner-barrel lanes with a dead chip (one chip per lane there).
    pub inner_lanes_with_dead: usize,
    /// Outer-barrel lanes with at least one dead chip.
    pub outer_lanes_with_dead: usize,
}

impl StaticMapSummary {
    pub fn new(elements: &BTreeSet<ElementId>, topology: &Topology) -> TopologyResult<Self> {
        let mut summary = Self {
            dead_per_lane: vec![0; topology.n_lanes()],
            dead_elements: elements.len(),
            ..Self::default()
        };
        for &element in elements {
            let lane = topology.element_to_lane(element)?;
            summary.dead_per_lane[lane.index()] += 1;
        }
        for (index, &dead) in summary.dead_per_lane.iter().enumerate() {
            if dead == 0 {
                continue;
            }
            match topology.lane_to_barrel(LaneId(index as u16))? {
                Barrel::Inner => summary.inner_lanes_with_dead += 1,
                Barrel::Outer => summary.outer_lanes_with_dead += 1,
            }
        }
        Ok(summary)
    }

    pub fn lanes_with_dead(&self, barrel: Barrel) -> usize {
        match barrel {
            Barrel::Inner => self.inner_lanes_with_dead,
            Barrel::Outer => self.outer_lanes_with_dead,
        }
    }
}
