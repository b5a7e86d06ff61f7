use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DecodeError;

/// Map format versions sharing the interval word encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapVersion {
    V2,
    V3,
    V4,
}

impl MapVersion {
    /// Every version this decoder understands.
    pub const SUPPORTED: [MapVersion; 3] = [MapVersion::V2, MapVersion::V3, MapVersion::V4];

    /// Canonical tag as stored in the map object.
    pub const fn tag(self) -> &'static str {
        match self {
            MapVersion::V2 => "2",
            MapVersion::V3 => "3",
            MapVersion::V4 => "4",
        }
    }
}

impl FromStr for MapVersion {
    type Err = DecodeError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "2" => Ok(MapVersion::V2),
            "3" => Ok(MapVersion::V3),
            "4" => Ok(MapVersion::V4),
            _ => Err(DecodeError::UnrecognizedVersion {
                tag: tag.to_owned(),
            }),
        }
    }
}

impl fmt::Display for MapVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
