use thiserror::Error;

use super::QaConfig;
use crate::qa::{Bands, QaThresholds};

/// Error enumeration for configuration validation failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Orbit period must be finite and positive.
    #[error("orbit period must be positive, got {got} ns")]
    InvalidOrbitPeriod { got: f64 },
    /// The nominal gap cut must be non-zero.
    #[error("nominal gap must be non-zero")]
    NominalGapZero,
    /// The unanchorable cut must not be below the nominal cut.
    #[error("unanchorable gap {unanchorable} below nominal gap {nominal}")]
    UnanchorableBelowNominal { nominal: u64, unanchorable: u64 },
    /// Ramp-up window must be finite and non-negative.
    #[error("ramp-up window must be non-negative, got {got} s")]
    InvalidRampUp { got: f64 },
    /// Smoothing window must be finite and non-negative.
    #[error("smoothing window must be non-negative, got {got} s")]
    InvalidSmoothingWindow { got: f64 },
    /// Decimation step of the smoothed curves must be at least one.
    #[error("smoothing decimation must be at least 1")]
    ZeroDecimation,
    /// A threshold table had non-finite or unordered cut points.
    #[error("threshold table {table} is malformed")]
    InvalidThreshold { table: &'static str },
    /// The JSON document could not be parsed.
    #[error("invalid configuration document: {0}")]
    Json(String),
}

/// Validates every configuration invariant.
pub fn validate(config: &QaConfig) -> Result<(), ConfigError> {
    if !(config.orbit_ns.is_finite() && config.orbit_ns > 0.0) {
        return Err(ConfigError::InvalidOrbitPeriod {
            got: config.orbit_ns,
        });
    }
    validate_gaps(config.nominal_gap, config.unanchorable_gap)?;
    if !(config.ramp_up_s.is_finite() && config.ramp_up_s >= 0.0) {
        return Err(ConfigError::InvalidRampUp {
            got: config.ramp_up_s,
        });
    }
    let window = config.smoothing.window_s;
    if !(window.is_finite() && window >= 0.0) {
        return Err(ConfigError::InvalidSmoothingWindow { got: window });
    }
    if config.smoothing.every == 0 {
        return Err(ConfigError::ZeroDecimation);
    }
    validate_thresholds(&config.thresholds)
}

fn validate_gaps(nominal: u64, unanchorable: u64) -> Result<(), ConfigError> {
    if nominal == 0 {
        return Err(ConfigError::NominalGapZero);
    }
    if unanchorable < nominal {
        return Err(ConfigError::UnanchorableBelowNominal {
            nominal,
            unanchorable,
        });
    }
    Ok(())
}

fn validate_thresholds(thresholds: &QaThresholds) -> Result<(), ConfigError> {
    let tables: [(&'static str, &Bands); 6] = [
        ("fully_dead_ib", &thresholds.fully_dead_ib),
        ("fully_dead_ob", &thresholds.fully_dead_ob),
        ("unanchorable_fraction", &thresholds.unanchorable_fraction),
        ("dead_time_ib", &thresholds.dead_time_ib),
        ("dead_time_ob", &thresholds.dead_time_ob),
        ("lookup_duration", &thresholds.lookup_duration),
    ];
    for (table, bands) in tables {
        if !bands.is_well_formed() {
            return Err(ConfigError::InvalidThreshold { table });
        }
    }
    let gaps = &thresholds.gaps;
    if !(gaps.bad_gap_factor.is_finite() && gaps.bad_step_fraction.is_finite()) {
        return Err(ConfigError::InvalidThreshold { table: "gaps" });
    }
    let range = &thresholds.orbit_range;
    if !(range.excess_s.is_finite()
        && range.good_deficit_s.is_finite()
        && range.medium_deficit_s.is_finite()
        && range.good_deficit_s <= range.medium_deficit_s)
    {
        return Err(ConfigError::InvalidThreshold {
            table: "orbit_range",
        });
    }
    Ok(())
}
