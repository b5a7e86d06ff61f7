//! Interval codec for dead-channel word streams.
//!
//! A stream is a flat sequence of 16-bit words. A word with the high bit set
//! opens a range: its low 15 bits are the first chip id and the next word is
//! the inclusive last chip id. Any other word names a single chip. The decoder
//! expands a stream into chips, lanes or fully covered staves; the lane and
//! stave expansions require each interval to start on the first chip of a lane
//! and end on the last chip of a lane.
//!
//! Decoding is all-or-nothing. The first malformed interval aborts the call
//! and no partial set is returned.

mod decoder;
mod error;
mod reader;
mod version;

pub use decoder::{Decoded, Granularity, IntervalDecoder};
pub use error::{DecodeError, DecodeFailure, DecodeResult, IntervalEdge};
pub use reader::{Interval, IntervalReader, ID_MASK, RANGE_START_FLAG};
pub use version::MapVersion;

#[cfg(test)]
mod tests;
