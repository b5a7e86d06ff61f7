use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::topology::TopologyError;

/// Which end of an interval failed the lane-boundary check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntervalEdge {
    /// The first chip is not the first chip of a lane.
    Start,
    /// The last chip is not the last chip of a lane.
    End,
}

/// Broad failure classes reported to the quality report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodeFailure {
    /// The word stream itself was inconsistent.
    MalformedStream,
    /// The map declared a format version this decoder does not know.
    UnrecognizedFormat,
}

/// Errors raised while expanding an interval-encoded word stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Unknown map format tag.
    #[error("map version {tag:?} not recognized")]
    UnrecognizedVersion { tag: String },
    /// A range-start word was the last word of the stream.
    #[error("range start at word {position} has no closing word")]
    TruncatedRange { position: usize },
    /// The closing id of a range preceded its opening id.
    #[error("interval {first}:{last} is reversed")]
    ReversedRange { first: u16, last: u16 },
    /// A chip id beyond the detector.
    #[error("chip {element} out of range (detector has {limit} chips)")]
    ElementOutOfRange { element: u16, limit: usize },
    /// A lane- or stave-level interval does not start or end on a lane edge.
    #[error("interval {first}:{last} is not aligned to lanes at its {edge:?} edge")]
    MisalignedInterval {
        first: u16,
        last: u16,
        edge: IntervalEdge,
    },
    /// A topology lookup failed on an id that passed the range check.
    #[error(transparent)]
    Topology(#[from] TopologyError),
}

impl DecodeError {
    /// Returns the failure class used when recording the error.
    pub fn failure(&self) -> DecodeFailure {
        match self {
            DecodeError::UnrecognizedVersion { .. } => DecodeFailure::UnrecognizedFormat,
            DecodeError::TruncatedRange { .. }
            | DecodeError::ReversedRange { .. }
            | DecodeError::ElementOutOfRange { .. }
            | DecodeError::MisalignedInterval { .. }
            | DecodeError::Topology(_) => DecodeFailure::MalformedStream,
        }
    }
}

/// Convenient alias for decoder results.
pub type DecodeResult<T> = core::result::Result<T, DecodeError>;
