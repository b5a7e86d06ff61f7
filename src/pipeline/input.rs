use serde::{Deserialize, Serialize};

use crate::topology::TimeKey;

/// Encoded words of one evolving-map snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapSnapshot {
    pub key: TimeKey,
    pub words: Vec<u16>,
}

/// Dead-map object as handed over by the storage collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadMapObject {
    /// Format tag of every word stream in the object.
    pub version: String,
    /// Placeholder served when no map was produced for the run.
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub static_words: Vec<u16>,
    #[serde(default)]
    pub snapshots: Vec<MapSnapshot>,
}

impl DeadMapObject {
    pub fn evolving_len(&self) -> usize {
        self.snapshots.len()
    }

    /// Snapshot keys in the order they were stored.
    pub fn keys(&self) -> impl Iterator<Item = TimeKey> + '_ {
        self.snapshots.iter().map(|snapshot| snapshot.key)
    }
}

/// External run boundaries in milliseconds since the epoch.
///
/// `orbit_reset_us` is the orbit-counter reset time in microseconds; when it
/// is known, orbit keys can be placed on the same clock as the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTiming {
    pub start_ms: i64,
    pub stop_ms: i64,
    #[serde(default)]
    pub orbit_reset_us: Option<i64>,
}

impl RunTiming {
    pub fn new(start_ms: i64, stop_ms: i64) -> Self {
        Self {
            start_ms,
            stop_ms,
            orbit_reset_us: None,
        }
    }

    pub fn with_orbit_reset(mut self, orbit_reset_us: i64) -> Self {
        self.orbit_reset_us = Some(orbit_reset_us);
        self
    }

    /// A lookup that found no run reports both boundaries as zero.
    pub fn is_available(&self) -> bool {
        !(self.start_ms == 0 && self.stop_ms == 0)
    }

    pub fn duration_s(&self) -> f64 {
        (self.stop_ms - self.start_ms) as f64 / 1000.0
    }

    /// Wall-clock time of `orbit` in milliseconds, rounded up.
    pub fn orbit_to_ms(&self, orbit: TimeKey, orbit_ns: f64) -> Option<i64> {
        self.orbit_reset_us
            .map(|reset_us| ((orbit as f64 * orbit_ns / 1000.0 + reset_us as f64) / 1000.0).ceil() as i64)
    }
}

/// Map boundaries placed on the run clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapWindow {
    pub start_ms: i64,
    pub stop_ms: i64,
}
