use super::validate::{validate, ConfigError};
use super::{QaConfig, SmoothingConfig, NOMINAL_GAP, ORBIT_NS, RAMP_UP_S, UNANCHORABLE_GAP};
use crate::qa::QaThresholds;

/// Builder used to assemble a [`QaConfig`] with validation.
///
/// Fields are public so callers can override individual knobs before calling
/// [`QaConfigBuilder::build`].
#[derive(Debug, Clone)]
pub struct QaConfigBuilder {
    pub orbit_ns: f64,
    pub nominal_gap: u64,
    pub unanchorable_gap: u64,
    pub ramp_up_s: f64,
    pub smoothing: SmoothingConfig,
    pub thresholds: QaThresholds,
}

impl QaConfigBuilder {
    /// Returns a builder initialised with the production defaults.
    pub fn new() -> Self {
        Self {
            orbit_ns: ORBIT_NS,
            nominal_gap: NOMINAL_GAP,
            unanchorable_gap: UNANCHORABLE_GAP,
            ramp_up_s: RAMP_UP_S,
            smoothing: SmoothingConfig::default(),
            thresholds: QaThresholds::default(),
        }
    }

    pub fn ramp_up_s(mut self, seconds: f64) -> Self {
        self.ramp_up_s = seconds;
        self
    }

    pub fn gaps(mut self, nominal: u64, unanchorable: u64) -> Self {
        self.nominal_gap = nominal;
        self.unanchorable_gap = unanchorable;
        self
    }

    pub fn smoothing(mut self, window_s: f64, every: usize) -> Self {
        self.smoothing = SmoothingConfig { window_s, every };
        self
    }

    pub fn thresholds(mut self, thresholds: QaThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Validates the builder fields and emits a [`QaConfig`].
    pub fn build(&self) -> Result<QaConfig, ConfigError> {
        let config = self.clone().into_config();
        validate(&config)?;
        Ok(config)
    }

    pub(super) fn into_config(self) -> QaConfig {
        QaConfig {
            orbit_ns: self.orbit_ns,
            nominal_gap: self.nominal_gap,
            unanchorable_gap: self.unanchorable_gap,
            ramp_up_s: self.ramp_up_s,
            smoothing: self.smoothing,
            thresholds: self.thresholds,
        }
    }
}

impl Default for QaConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
