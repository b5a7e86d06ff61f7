use crate::topology::{Barrel, LaneId, Topology, TopologyResult};

/// Per-lane lookup table resolved once per aggregation pass.
#[derive(Debug, Clone)]
pub(crate) struct LaneTable {
    layer: Vec<u8>,
    stave: Vec<u16>,
    barrel: Vec<Barrel>,
}

impl LaneTable {
    pub(crate) fn new(topology: &Topology) -> TopologyResult<Self> {
        let lanes = topology.n_lanes();
        let mut table = Self {
            layer: Vec::with_capacity(lanes),
            stave: Vec::with_capacity(lanes),
            barrel: Vec::with_capacity(lanes),
        };
        for lane in 0..lanes {
            let lane = LaneId(lane as u16);
            let layer = topology.lane_to_layer(lane)?;
            table.layer.push(layer.0);
            table.stave.push(topology.lane_to_stave(lane)?.0);
            table.barrel.push(topology.layer(layer)?.barrel);
        }
        Ok(table)
    }

    pub(crate) fn len(&self) -> usize {
        self.layer.len()
    }

    pub(crate) fn contains(&self, lane: LaneId) -> bool {
        lane.index() < self.len()
    }

    /// Callers check [`LaneTable::contains`] first.
    pub(crate) fn layer(&self, lane: LaneId) -> usize {
        self.layer[lane.index()] as usize
    }

    pub(crate) fn stave(&self, lane: LaneId) -> usize {
        self.stave[lane.index()] as usize
    }

    pub(crate) fn barrel(&self, lane: LaneId) -> Barrel {
        self.barrel[lane.index()]
    }
}
