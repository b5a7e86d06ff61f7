use serde::{Deserialize, Serialize};

use super::ids::Barrel;

/// Static description of one detector layer.
///
/// | Field | Meaning |
/// |-------|---------|
/// | `staves` | Number of staves mounted in the layer |
/// | `lanes_per_stave` | Readout lanes served by one stave |
/// | `elements_per_lane` | Chips sharing one lane (lane width) |
/// | `barrel` | Barrel the layer belongs to |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub staves: u16,
    pub lanes_per_stave: u16,
    pub elements_per_lane: u16,
    pub barrel: Barrel,
}

impl LayerSpec {
    /// Total lanes in the layer.
    pub const fn lanes(&self) -> usize {
        self.staves as usize * self.lanes_per_stave as usize
    }

    /// Total chips in the layer.
    pub const fn elements(&self) -> usize {
        self.lanes() * self.elements_per_lane as usize
    }
}

/// Layer table of the seven-layer tracker.
///
/// | Layer | Staves | Lanes/stave | Chips/lane | Barrel |
/// |-------|--------|-------------|------------|--------|
/// | 0 | 12 | 9 | 1 | IB |
/// | 1 | 16 | 9 | 1 | IB |
/// | 2 | 20 | 9 | 1 | IB |
/// | 3 | 24 | 16 | 7 | OB |
/// | 4 | 30 | 16 | 7 | OB |
/// | 5 | 42 | 28 | 7 | OB |
/// | 6 | 48 | 28 | 7 | OB |
pub const ITS_LAYERS: [LayerSpec; 7] = [
    LayerSpec {
        staves: 12,
        lanes_per_stave: 9,
        elements_per_lane: 1,
        barrel: Barrel::Inner,
    },
    LayerSpec {
        staves: 16,
        lanes_per_stave: 9,
        elements_per_lane: 1,
        barrel: Barrel::Inner,
    },
    LayerSpec {
        staves: 20,
        lanes_per_stave: 9,
        elements_per_lane: 1,
        barrel: Barrel::Inner,
    },
    LayerSpec {
        staves: 24,
        lanes_per_stave: 16,
        elements_per_lane: 7,
        barrel: Barrel::Outer,
    },
    LayerSpec {
        staves: 30,
        lanes_per_stave: 16,
        elements_per_lane: 7,
        barrel: Barrel::Outer,
    },
    LayerSpec {
        staves: 42,
        lanes_per_stave: 28,
        elements_per_lane: 7,
        barrel: Barrel::Outer,
    },
    LayerSpec {
        staves: 48,
        lanes_per_stave: 28,
        elements_per_lane: 7,
        barrel: Barrel::Outer,
    },
];

/// Number of layers.
pub const N_LAYERS: usize = ITS_LAYERS.len();
/// Number of staves across all layers.
pub const N_STAVES: usize =
    sum_staves(&ITS_LAYERS, Barrel::Inner) + sum_staves(&ITS_LAYERS, Barrel::Outer);
/// Staves in the inner barrel.
pub const N_STAVES_IB: usize = sum_staves(&ITS_LAYERS, Barrel::Inner);
/// Lanes in the inner barrel.
pub const N_LANES_IB: usize = sum_lanes(&ITS_LAYERS, Barrel::Inner);
/// Lanes in the outer barrel.
pub const N_LANES_OB: usize = sum_lanes(&ITS_LAYERS, Barrel::Outer);
/// Number of lanes across all layers.
pub const N_LANES: usize = N_LANES_IB + N_LANES_OB;
/// Number of chips across all layers.
pub const N_ELEMENTS: usize = sum_elements(&ITS_LAYERS);

const fn sum_staves(layers: &[LayerSpec], barrel: Barrel) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < layers.len() {
        if layers[i].barrel as u8 == barrel as u8 {
            total += layers[i].staves as usize;
        }
        i += 1;
    }
    total
}

const fn sum_lanes(layers: &[LayerSpec], barrel: Barrel) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < layers.len() {
        if layers[i].barrel as u8 == barrel as u8 {
            total += layers[i].lanes();
        }
        i += 1;
    }
    total
}

const fn sum_elements(layers: &[LayerSpec]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < layers.len() {
        total += layers[i].elements();
        i += 1;
    }
    total
}
