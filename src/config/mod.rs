//! Run configuration for the quality pipeline.
//!
//! [`QaConfig`] gathers every tunable of a run: the orbit period used to turn
//! orbit counters into seconds, the two gap cuts, the ramp-up window, the
//! smoothing of the dead-fraction curves and the classifier thresholds.
//! Configurations are assembled with [`QaConfigBuilder`], which starts from
//! the defaults below and validates on [`QaConfigBuilder::build`].
//!
//! | Field | Default |
//! |-------|---------|
//! | `orbit_ns` | `88924.6` |
//! | `nominal_gap` | `32000` orbits |
//! | `unanchorable_gap` | `330000` orbits |
//! | `ramp_up_s` | `15` s |
//! | `smoothing` | window `30` s, keep every `5`th point |
//! | `thresholds` | [`QaThresholds::default`] |

mod builder;
mod validate;

use serde::{Deserialize, Serialize};

use crate::qa::{Classifier, QaThresholds};

pub use builder::QaConfigBuilder;
pub use validate::ConfigError;

/// Duration of one orbit in nanoseconds.
pub const ORBIT_NS: f64 = 88_924.6;
/// Snapshot spacing above which a gap counts as non-nominal, in orbits.
pub const NOMINAL_GAP: u64 = 32_000;
/// Snapshot spacing above which data can no longer be anchored, in orbits.
pub const UNANCHORABLE_GAP: u64 = 330_000;
/// Start-of-run window excluded from ramp-sensitive statistics, in seconds.
pub const RAMP_UP_S: f64 = 15.0;

/// Rolling-average settings for the dead-fraction curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingConfig {
    /// Full width of the averaging window in seconds.
    pub window_s: f64,
    /// Keep every `every`-th smoothed point.
    pub every: usize,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            window_s: 30.0,
            every: 5,
        }
    }
}

/// Validated configuration of one quality run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaConfig {
    pub orbit_ns: f64,
    pub nominal_gap: u64,
    pub unanchorable_gap: u64,
    pub ramp_up_s: f64,
    pub smoothing: SmoothingConfig,
    pub thresholds: QaThresholds,
}

impl QaConfig {
    /// Parses a JSON document and validates the result.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: QaConfig =
            serde_json::from_str(json).map_err(|err| ConfigError::Json(err.to_string()))?;
        validate::validate(&config)?;
        Ok(config)
    }

    /// Checks every configuration invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate::validate(self)
    }

    /// Seconds spanned by `orbits` orbits.
    pub fn orbits_to_seconds(&self, orbits: u64) -> f64 {
        orbits as f64 * self.orbit_ns * 1.0e-9
    }

    /// Classifier wired with this configuration's thresholds and gap cuts.
    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.thresholds, self.nominal_gap, self.unanchorable_gap)
    }
}

impl Default for QaConfig {
    fn default() -> Self {
        QaConfigBuilder::new().into_config()
    }
}

#[cfg(test)]
mod tests;
