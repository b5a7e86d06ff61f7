use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{DecodeError, DecodeResult, IntervalEdge};
use super::reader::{Interval, IntervalReader};
use super::version::MapVersion;
use crate::topology::{ElementId, LaneId, StaveId, Topology};

/// Level of the hierarchy a word stream is expanded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    /// Every chip of every interval, no alignment requirement.
    Element,
    /// Lanes covered by lane-aligned chip intervals.
    Lane,
    /// Staves whose every lane is covered by the stream.
    Stave,
}

/// Result of one decode call at a given [`Granularity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decoded {
    Elements(BTreeSet<ElementId>),
    Lanes(BTreeSet<LaneId>),
    Staves(BTreeSet<StaveId>),
}

impl Decoded {
    /// Number of ids in the decoded set.
    pub fn len(&self) -> usize {
        match self {
            Decoded::Elements(set) => set.len(),
            Decoded::Lanes(set) => set.len(),
            Decoded::Staves(set) => set.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn granularity(&self) -> Granularity {
        match self {
            Decoded::Elements(_) => Granularity::Element,
            Decoded::Lanes(_) => Granularity::Lane,
            Decoded::Staves(_) => Granularity::Stave,
        }
    }
}

/// Expands interval-encoded word streams of one map version.
///
/// Every decode call either returns the complete set or an error; partially
/// expanded streams are never handed out.
#[derive(Debug, Clone, Copy)]
pub struct IntervalDecoder<'t> {
    topology: &'t Topology,
    version: MapVersion,
}

impl<'t> IntervalDecoder<'t> {
    /// Creates a decoder for the map version named by `tag`.
    pub fn new(topology: &'t Topology, tag: &str) -> DecodeResult<Self> {
        let version = tag.parse()?;
        Ok(Self::with_version(topology, version))
    }

    pub fn with_version(topology: &'t Topology, version: MapVersion) -> Self {
        Self { topology, version }
    }

    pub fn version(&self) -> MapVersion {
        self.version
    }

    pub fn topology(&self) -> &'t Topology {
        self.topology
    }

    /// Decodes `words` at the requested granularity.
    pub fn decode(&self, words: &[u16], granularity: Granularity) -> DecodeResult<Decoded> {
        match granularity {
            Granularity::Element => self.decode_elements(words).map(Decoded::Elements),
            Granularity::Lane => self.decode_lanes(words).map(Decoded::Lanes),
            Granularity::Stave => self.decode_staves(words).map(Decoded::Staves),
        }
    }

    /// Expands every interval into its chips.
    pub fn decode_elements(&self, words: &[u16]) -> DecodeResult<BTreeSet<ElementId>> {
        let mut elements = BTreeSet::new();
        for interval in IntervalReader::new(words) {
            let interval = self.checked(interval?)?;
            debug!(
                first = interval.first,
                last = interval.last,
                chips = interval.span(),
                "decoded chip interval"
            );
            elements.extend((interval.first..=interval.last).map(ElementId));
        }
        Ok(elements)
    }

    /// Expands lane-aligned chip intervals into lanes.
    pub fn decode_lanes(&self, words: &[u16]) -> DecodeResult<BTreeSet<LaneId>> {
        let mut lanes = BTreeSet::new();
        for interval in IntervalReader::new(words) {
            let interval = self.checked(interval?)?;
            let (first, last) = self.aligned_lanes(interval)?;
            lanes.extend((first.0..=last.0).map(LaneId));
        }
        Ok(lanes)
    }

    /// Returns the staves fully covered by the lanes of the whole stream.
    ///
    /// Lane counts are accumulated across every interval of the call, so a
    /// stave split over several intervals is still reported.
    pub fn decode_staves(&self, words: &[u16]) -> DecodeResult<BTreeSet<StaveId>> {
        let lanes = self.decode_lanes(words)?;
        Ok(self.topology.fully_dead_staves(&lanes)?)
    }

    fn checked(&self, interval: Interval) -> DecodeResult<Interval> {
        let limit = self.topology.n_elements();
        if interval.last as usize >= limit {
            return Err(DecodeError::ElementOutOfRange {
                element: interval.last,
                limit,
            });
        }
        Ok(interval)
    }

    fn aligned_lanes(&self, interval: Interval) -> DecodeResult<(LaneId, LaneId)> {
        let misaligned = |edge| DecodeError::MisalignedInterval {
            first: interval.first,
            last: interval.last,
            edge,
        };
        let first = self
            .topology
            .lane_starting_at(ElementId(interval.first))?
            .ok_or_else(|| misaligned(IntervalEdge::Start))?;
        let last = self
            .topology
            .lane_ending_at(ElementId(interval.last))?
            .ok_or_else(|| misaligned(IntervalEdge::End))?;
        Ok((first, last))
    }
}
