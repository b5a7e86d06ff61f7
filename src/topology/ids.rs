//! Identifiers for the four levels of the detector hierarchy.
//!
//! All identifiers are flat, zero-based indices. Their ranges are fixed by the
//! layer table in [`super::layout`]; the newtypes only exist so that a lane
//! index cannot be passed where a stave index is expected.

use core::fmt;
use serde::{Deserialize, Serialize};

/// Index of one sensor chip in `[0, N_ELEMENTS)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementId(pub u16);

/// Index of one readout lane in `[0, N_LANES)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LaneId(pub u16);

/// Global stave index in `[0, N_STAVES)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StaveId(pub u16);

/// Layer index in `[0, N_LAYERS)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LayerId(pub u8);

/// Timestamp-like key of one evolving-map snapshot (an orbit counter).
pub type TimeKey = u64;

macro_rules! impl_index {
    ($ty:ident, $inner:ty, $prefix:literal) => {
        impl $ty {
            /// Returns the identifier as a `usize` suitable for slice indexing.
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl From<$inner> for $ty {
            fn from(value: $inner) -> Self {
                $ty(value)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

impl_index!(ElementId, u16, "chip ");
impl_index!(LaneId, u16, "lane ");
impl_index!(StaveId, u16, "stave ");
impl_index!(LayerId, u8, "L");

/// Barrel grouping of the layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Barrel {
    /// Innermost layers, one chip per lane.
    Inner,
    /// Middle and outer layers, several chips per lane.
    Outer,
}

impl Barrel {
    /// Both barrels in detector order.
    pub const ALL: [Barrel; 2] = [Barrel::Inner, Barrel::Outer];

    /// Position of the barrel in per-barrel arrays.
    pub const fn index(self) -> usize {
        match self {
            Barrel::Inner => 0,
            Barrel::Outer => 1,
        }
    }
}

impl fmt::Display for Barrel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Barrel::Inner => write!(f, "IB"),
            Barrel::Outer => write!(f, "OB"),
        }
    }
}
