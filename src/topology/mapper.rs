use core::ops::Range;
use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ids::{Barrel, ElementId, LaneId, LayerId, StaveId};
use super::layout::{LayerSpec, ITS_LAYERS};

/// Largest chip index representable in the 15-bit payload of an encoded word.
pub const MAX_ENCODABLE_ELEMENT: usize = 0x7FFF;

static ITS_TOPOLOGY: Lazy<Topology> = Lazy::new(|| Topology::from_static(&ITS_LAYERS));

/// Errors surfaced by the topology lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    /// Chip index beyond the last chip of the detector.
    #[error("chip {element} out of range (detector has {limit} chips)")]
    ElementOutOfRange { element: u16, limit: usize },
    /// Lane index beyond the last lane of the detector.
    #[error("lane {lane} out of range (detector has {limit} lanes)")]
    LaneOutOfRange { lane: u16, limit: usize },
    /// Stave index beyond the last stave of the detector.
    #[error("stave {stave} out of range (detector has {limit} staves)")]
    StaveOutOfRange { stave: u16, limit: usize },
    /// Layer index beyond the last layer of the detector.
    #[error("layer {layer} out of range (detector has {limit} layers)")]
    LayerOutOfRange { layer: u8, limit: usize },
    /// The layer table contained no layers.
    #[error("layer table is empty")]
    EmptyLayout,
    /// A layer declared zero staves, lanes or chips per lane.
    #[error("layer {layer} has a zero-sized dimension")]
    DegenerateLayer { layer: usize },
    /// The chip count does not fit the 15-bit word payload.
    #[error("{elements} chips exceed the encodable id space of {max}")]
    IdSpaceExceeded { elements: usize, max: usize },
}

/// Convenient alias for topology results.
pub type TopologyResult<T> = core::result::Result<T, TopologyError>;

/// Full coordinates of a lane inside the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneCoordinates {
    pub layer: LayerId,
    pub stave: StaveId,
    pub stave_in_layer: u16,
    pub lane_in_layer: u16,
    pub lane_in_stave: u16,
}

/// Pure mapper between flat chip/lane/stave indices and the layer hierarchy.
///
/// The mapper only stores the layer table and its prefix sums; every lookup is
/// a short walk over the cumulative counts, so a shared reference can be used
/// from any number of threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    layers: Vec<LayerSpec>,
    element_offsets: Vec<usize>,
    lane_offsets: Vec<usize>,
    stave_offsets: Vec<usize>,
}

impl Topology {
    /// Returns the mapper for the built-in seven-layer detector.
    pub fn its() -> &'static Topology {
        &ITS_TOPOLOGY
    }

    /// Builds a mapper over a custom layer table after validating it.
    pub fn new(layers: Vec<LayerSpec>) -> TopologyResult<Self> {
        if layers.is_empty() {
            return Err(TopologyError::EmptyLayout);
        }
        for (index, spec) in layers.iter().enumerate() {
            if spec.staves == 0 || spec.lanes_per_stave == 0 || spec.elements_per_lane == 0 {
                return Err(TopologyError::DegenerateLayer { layer: index });
            }
        }
        let elements: usize = layers
            .iter()
            .map(LayerSpec::elements)
            .sum();
        if elements > MAX_ENCODABLE_ELEMENT + 1 {
            return Err(TopologyError::IdSpaceExceeded {
                elements,
                max: MAX_ENCODABLE_ELEMENT + 1,
            });
        }
        Ok(Self::from_static(&layers))
    }

    fn from_static(layers: &[LayerSpec]) -> Self {
        let mut element_offsets = Vec::with_capacity(layers.len() + 1);
        let mut lane_offsets = Vec::with_capacity(layers.len() + 1);
        let mut stave_offsets = Vec::with_capacity(layers.len() + 1);
        let (mut elements, mut lanes, mut staves) = (0usize, 0usize, 0usize);
        for spec in layers {
            element_offsets.push(elements);
            lane_offsets.push(lanes);
            stave_offsets.push(staves);
            elements += spec.elements();
            lanes += spec.lanes();
            staves += spec.staves as usize;
        }
        element_offsets.push(elements);
        lane_offsets.push(lanes);
        stave_offsets.push(staves);
        Self {
            layers: layers.to_vec(),
            element_offsets,
            lane_offsets,
            stave_offsets,
        }
    }

    /// Layer table backing the mapper.
    pub fn layers(&self) -> &[LayerSpec] {
        &self.layers
    }

    pub fn n_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn n_staves(&self) -> usize {
        self.stave_offsets[self.layers.len()]
    }

    pub fn n_lanes(&self) -> usize {
        self.lane_offsets[self.layers.len()]
    }

    pub fn n_elements(&self) -> usize {
        self.element_offsets[self.layers.len()]
    }

    /// Number of lanes belonging to layers of the given barrel.
    pub fn n_lanes_in_barrel(&self, barrel: Barrel) -> usize {
        self.layers
            .iter()
            .filter(|spec| spec.barrel == barrel)
            .map(LayerSpec::lanes)
            .sum()
    }

    /// Returns the static description of a layer.
    pub fn layer(&self, layer: LayerId) -> TopologyResult<&LayerSpec> {
        self.layers
            .get(layer.index())
            .ok_or(TopologyError::LayerOutOfRange {
                layer: layer.0,
                limit: self.layers.len(),
            })
    }

    /// Maps a chip to the layer it is mounted in.
    pub fn element_to_layer(&self, element: ElementId) -> TopologyResult<LayerId> {
        let index = element.index();
        if index >= self.n_elements() {
            return Err(TopologyError::ElementOutOfRange {
                element: element.0,
                limit: self.n_elements(),
            });
        }
        Ok(LayerId(walk(&self.element_offsets, index) as u8))
    }

    /// Maps a chip to the lane reading it out.
    ///
    /// Chips of width-one layers map onto the lane with the same index; in the
    /// other layers `lane = lane_offset + (chip - chip_offset) / width`.
    pub fn element_to_lane(&self, element: ElementId) -> TopologyResult<LaneId> {
        let layer = self.element_to_layer(element)?.index();
        let spec = &self.layers[layer];
        let in_layer = element.index() - self.element_offsets[layer];
        let lane = self.lane_offsets[layer] + in_layer / spec.elements_per_lane as usize;
        Ok(LaneId(lane as u16))
    }

    /// First chip read out by a lane.
    pub fn first_element_of_lane(&self, lane: LaneId) -> TopologyResult<ElementId> {
        let layer = self.lane_to_layer(lane)?.index();
        let width = self.layers[layer].elements_per_lane as usize;
        let in_layer = lane.index() - self.lane_offsets[layer];
        Ok(ElementId((self.element_offsets[layer] + in_layer * width) as u16))
    }

    /// Last chip read out by a lane.
    pub fn last_element_of_lane(&self, lane: LaneId) -> TopologyResult<ElementId> {
        let layer = self.lane_to_layer(lane)?.index();
        let width = self.layers[layer].elements_per_lane;
        let first = self.first_element_of_lane(lane)?;
        Ok(ElementId(first.0 + width - 1))
    }

    /// All chips of a lane.
    pub fn lane_elements(&self, lane: LaneId) -> TopologyResult<Range<u16>> {
        let first = self.first_element_of_lane(lane)?;
        let last = self.last_element_of_lane(lane)?;
        Ok(first.0..last.0 + 1)
    }

    /// Returns the lane whose first chip is `element`, if any.
    pub fn lane_starting_at(&self, element: ElementId) -> TopologyResult<Option<LaneId>> {
        let lane = self.element_to_lane(element)?;
        let first = self.first_element_of_lane(lane)?;
        Ok((first == element).then_some(lane))
    }

    /// Returns the lane whose last chip is `element`, if any.
    pub fn lane_ending_at(&self, element: ElementId) -> TopologyResult<Option<LaneId>> {
        let lane = self.element_to_lane(element)?;
        let last = self.last_element_of_lane(lane)?;
        Ok((last == element).then_some(lane))
    }

    /// Maps a lane to its layer by walking the cumulative lane counts.
    pub fn lane_to_layer(&self, lane: LaneId) -> TopologyResult<LayerId> {
        let index = lane.index();
        if index >= self.n_lanes() {
            return Err(TopologyError::LaneOutOfRange {
                lane: lane.0,
                limit: self.n_lanes(),
            });
        }
        Ok(LayerId(walk(&self.lane_offsets, index) as u8))
    }

    /// Position of a lane within its layer.
    pub fn lane_to_lane_local(&self, lane: LaneId) -> TopologyResult<u16> {
        let layer = self.lane_to_layer(lane)?.index();
        Ok((lane.index() - self.lane_offsets[layer]) as u16)
    }

    /// Index of the lane's stave within its layer.
    pub fn lane_to_stave_local(&self, lane: LaneId) -> TopologyResult<u16> {
        let layer = self.lane_to_layer(lane)?.index();
        let local = lane.index() - self.lane_offsets[layer];
        Ok((local / self.layers[layer].lanes_per_stave as usize) as u16)
    }

    /// Global stave index of a lane.
    pub fn lane_to_stave(&self, lane: LaneId) -> TopologyResult<StaveId> {
        let layer = self.lane_to_layer(lane)?.index();
        let local = self.lane_to_stave_local(lane)? as usize;
        Ok(StaveId((self.stave_offsets[layer] + local) as u16))
    }

    /// Barrel the lane belongs to.
    pub fn lane_to_barrel(&self, lane: LaneId) -> TopologyResult<Barrel> {
        let layer = self.lane_to_layer(lane)?;
        Ok(self.layers[layer.index()].barrel)
    }

    /// Complete coordinates of a lane.
    pub fn lane_coordinates(&self, lane: LaneId) -> TopologyResult<LaneCoordinates> {
        let layer = self.lane_to_layer(lane)?;
        let spec = &self.layers[layer.index()];
        let lane_in_layer = self.lane_to_lane_local(lane)?;
        Ok(LaneCoordinates {
            layer,
            stave: self.lane_to_stave(lane)?,
            stave_in_layer: lane_in_layer / spec.lanes_per_stave,
            lane_in_layer,
            lane_in_stave: lane_in_layer % spec.lanes_per_stave,
        })
    }

    /// Maps a global stave index to its layer.
    pub fn stave_to_layer(&self, stave: StaveId) -> TopologyResult<LayerId> {
        let index = stave.index();
        if index >= self.n_staves() {
            return Err(TopologyError::StaveOutOfRange {
                stave: stave.0,
                limit: self.n_staves(),
            });
        }
        Ok(LayerId(walk(&self.stave_offsets, index) as u8))
    }

    pub fn first_lane_of_stave(&self, stave: StaveId) -> TopologyResult<LaneId> {
        let layer = self.stave_to_layer(stave)?.index();
        let local = stave.index() - self.stave_offsets[layer];
        let width = self.layers[layer].lanes_per_stave as usize;
        Ok(LaneId((self.lane_offsets[layer] + local * width) as u16))
    }

    pub fn last_lane_of_stave(&self, stave: StaveId) -> TopologyResult<LaneId> {
        let layer = self.stave_to_layer(stave)?.index();
        let first = self.first_lane_of_stave(stave)?;
        Ok(LaneId(first.0 + self.layers[layer].lanes_per_stave - 1))
    }

    /// Number of lanes mounted on a stave.
    pub fn lanes_on_stave(&self, stave: StaveId) -> TopologyResult<u16> {
        let layer = self.stave_to_layer(stave)?;
        Ok(self.layers[layer.index()].lanes_per_stave)
    }

    /// Lane index range of a layer.
    pub fn layer_lanes(&self, layer: LayerId) -> TopologyResult<Range<u16>> {
        self.layer(layer)?;
        let index = layer.index();
        Ok(self.lane_offsets[index] as u16..self.lane_offsets[index + 1] as u16)
    }

    /// Global stave index range of a layer.
    pub fn layer_staves(&self, layer: LayerId) -> TopologyResult<Range<u16>> {
        self.layer(layer)?;
        let index = layer.index();
        Ok(self.stave_offsets[index] as u16..self.stave_offsets[index + 1] as u16)
    }

    /// Staves for which every lane appears in `lanes`.
    ///
    /// Lanes outside the detector are rejected rather than ignored.
    pub fn fully_dead_staves(
        &self,
        lanes: &BTreeSet<LaneId>,
    ) -> TopologyResult<BTreeSet<StaveId>> {
        let mut dead_lanes = vec![0u16; self.n_staves()];
        for &lane in lanes {
            dead_lanes[self.lane_to_stave(lane)?.index()] += 1;
        }
        let mut staves = BTreeSet::new();
        for (index, &count) in dead_lanes.iter().enumerate() {
            let stave = StaveId(index as u16);
            if count == self.lanes_on_stave(stave)? {
                staves.insert(stave);
            }
        }
        Ok(staves)
    }
}

/// Returns the layer whose `[offset[l], offset[l + 1])` window contains `index`.
///
/// `offsets` carries one trailing total, and callers check `index` against it.
fn walk(offsets: &[usize], index: usize) -> usize {
    let mut layer = 0;
    while offsets[layer + 1] <= index {
        layer += 1;
    }
    layer
}
