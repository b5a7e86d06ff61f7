use core::fmt;

use serde::{Deserialize, Serialize};

/// Named entries of the quality report, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// The storage collaborator returned an object at all.
    ObjectPresent,
    /// The object is the placeholder served when no map exists.
    DefaultObject,
    /// Evolving and static maps are populated.
    MapSize,
    /// The map version tag is understood by the decoder.
    MapVersion,
    /// Every encoded interval decoded cleanly.
    ChipInterval,
    /// Inner-barrel chips in the static map.
    FullyDeadIb,
    /// Outer-barrel lanes with at least one chip in the static map.
    FullyDeadOb,
    /// Size and frequency of gaps between snapshots.
    OrbitGaps,
    /// Share of the map span lost to gaps beyond the unanchorable threshold.
    UnanchorableFraction,
    /// Mean inner-barrel lane dead time.
    AvgDeadTimeIb,
    /// Mean outer-barrel lane dead time.
    AvgDeadTimeOb,
    /// Map duration against the reference run duration.
    OrbitRange,
    /// Lookups at run start and stop return the same object.
    ObjectLookup,
    /// The evolving map returned by the lookup is non-empty.
    EvolvingMap,
    /// Gaps above the unanchorable threshold in the lookup check.
    LargeGaps,
    /// The first orbit stored in the map is meaningful.
    FirstOrbit,
    /// Map duration against run duration in the lookup check.
    Duration,
}

impl Metric {
    pub const fn name(self) -> &'static str {
        match self {
            Metric::ObjectPresent => "object_present",
            Metric::DefaultObject => "default_object",
            Metric::MapSize => "map_size",
            Metric::MapVersion => "map_version",
            Metric::ChipInterval => "chip_interval",
            Metric::FullyDeadIb => "fully_dead_ib",
            Metric::FullyDeadOb => "fully_dead_ob",
            Metric::OrbitGaps => "orbit_gaps",
            Metric::UnanchorableFraction => "unanchorable_fraction",
            Metric::AvgDeadTimeIb => "avg_dead_time_ib",
            Metric::AvgDeadTimeOb => "avg_dead_time_ob",
            Metric::OrbitRange => "orbit_range",
            Metric::ObjectLookup => "object_lookup",
            Metric::EvolvingMap => "evolving_map",
            Metric::LargeGaps => "large_gaps",
            Metric::FirstOrbit => "first_orbit",
            Metric::Duration => "duration",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Measured value of one classified metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MetricInput {
    /// Evolving-map snapshot count and static word count.
    MapSize { evolving: usize, static_words: usize },
    /// Inner-barrel lanes holding a dead chip in the static map.
    FullyDeadIb { dead_lanes: usize },
    /// Outer-barrel lanes holding a dead chip, relative to all lanes.
    FullyDeadOb {
        lanes_with_dead: usize,
        total_lanes: usize,
    },
    /// Gap summary over `steps` snapshots.
    OrbitGaps {
        max_gap: u64,
        over_nominal: usize,
        steps: usize,
    },
    UnanchorableFraction(f64),
    AvgDeadTimeIb(f64),
    AvgDeadTimeOb(f64),
    /// Map and reference durations in seconds.
    OrbitRange { map_s: f64, reference_s: f64 },
}

impl MetricInput {
    /// Report entry the value is classified under.
    pub const fn metric(&self) -> Metric {
        match self {
            MetricInput::MapSize { .. } => Metric::MapSize,
            MetricInput::FullyDeadIb { .. } => Metric::FullyDeadIb,
            MetricInput::FullyDeadOb { .. } => Metric::FullyDeadOb,
            MetricInput::OrbitGaps { .. } => Metric::OrbitGaps,
            MetricInput::UnanchorableFraction(_) => Metric::UnanchorableFraction,
            MetricInput::AvgDeadTimeIb(_) => Metric::AvgDeadTimeIb,
            MetricInput::AvgDeadTimeOb(_) => Metric::AvgDeadTimeOb,
            MetricInput::OrbitRange { .. } => Metric::OrbitRange,
        }
    }
}
