use serde::{Deserialize, Serialize};

use super::error::{DecodeError, DecodeResult};

/// Flag marking a word that opens a range.
pub const RANGE_START_FLAG: u16 = 0x8000;
/// Mask extracting the id carried by a range-start word.
pub const ID_MASK: u16 = 0x7FFF;

/// Closed id interval `[first, last]` carried by one or two words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub first: u16,
    pub last: u16,
}

impl Interval {
    /// Number of ids covered by the interval.
    pub fn span(&self) -> usize {
        (self.last - self.first) as usize + 1
    }

    /// Whether the interval came from a single word.
    pub fn is_singleton(&self) -> bool {
        self.first == self.last
    }
}

/// Cursor over an encoded word stream yielding one [`Interval`] per step.
///
/// A word with [`RANGE_START_FLAG`] set carries the first id in its low 15
/// bits and consumes the following word as the inclusive last id; any other
/// word is a singleton.
#[derive(Debug, Clone, Copy)]
pub struct IntervalReader<'a> {
    words: &'a [u16],
    offset: usize,
}

impl<'a> IntervalReader<'a> {
    pub fn new(words: &'a [u16]) -> Self {
        Self { words, offset: 0 }
    }

    /// Returns the index of the next unread word.
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Returns the number of words not yet consumed.
    pub fn remaining(&self) -> usize {
        self.words.len().saturating_sub(self.offset)
    }

    /// Reads the next interval, or `None` at the end of the stream.
    pub fn read_interval(&mut self) -> DecodeResult<Option<Interval>> {
        let Some(&word) = self.words.get(self.offset) else {
            return Ok(None);
        };
        let position = self.offset;
        self.offset += 1;
        if word & RANGE_START_FLAG == 0 {
            return Ok(Some(Interval {
                first: word,
                last: word,
            }));
        }
        let first = word & ID_MASK;
        let Some(&last) = self.words.get(self.offset) else {
            return Err(DecodeError::TruncatedRange { position });
        };
        self.offset += 1;
        if last < first {
            return Err(DecodeError::ReversedRange { first, last });
        }
        Ok(Some(Interval { first, last }))
    }
}

impl<'a> Iterator for IntervalReader<'a> {
    type Item = DecodeResult<Interval>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_interval().transpose()
    }
}

impl<'a> From<&'a [u16]> for IntervalReader<'a> {
    fn from(words: &'a [u16]) -> Self {
        IntervalReader::new(words)
    }
}
