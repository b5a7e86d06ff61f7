//! Static detector topology.
//!
//! Chips are grouped into readout lanes, lanes into staves and staves into
//! layers. Every level is addressed by a flat index, and the mapping between
//! levels is fully determined by the per-layer table in [`layout`]. The
//! [`Topology`] mapper precomputes prefix sums over that table and answers
//! every lookup without allocation or shared mutable state.
//!
//! # Invariants
//!
//! * chip → lane → stave → layer is total and non-decreasing in the index.
//! * Each lane covers `elements_per_lane` contiguous chips; each stave covers
//!   `lanes_per_stave` contiguous lanes.
//! * The total chip count fits into the 15-bit payload of an encoded word.

mod ids;
pub mod layout;
mod mapper;

pub use ids::{Barrel, ElementId, LaneId, LayerId, StaveId, TimeKey};
pub use layout::{
    LayerSpec, ITS_LAYERS, N_ELEMENTS, N_LANES, N_LANES_IB, N_LANES_OB, N_LAYERS, N_STAVES,
    N_STAVES_IB,
};
pub use mapper::{
    LaneCoordinates, Topology, TopologyError, TopologyResult, MAX_ENCODABLE_ELEMENT,
};
