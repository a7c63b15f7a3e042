use serde::{Deserialize, Serialize};
use simcore::{SimError, SimResult};

/// Largest timestep that still resolves braking points to within a few
/// metres at top speed (s).
pub const MAX_TIMESTEP: f64 = 0.05;

/// Integrator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed timestep (s).
    pub dt: f64,
    /// Hard cap on integration steps; a lap that has not finished by then is
    /// returned unconverged.
    pub max_iterations: usize,
    /// Record a telemetry sample every `sample_stride` steps.
    pub sample_stride: usize,
    /// Brake when speed exceeds `brake_threshold` times the segment limit.
    pub brake_threshold: f64,
    /// Accelerate while speed is below `accelerate_threshold` times the limit.
    pub accelerate_threshold: f64,
    /// Straights shorter than this never open DRS (m).
    pub drs_min_straight_length: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            dt: MAX_TIMESTEP,
            max_iterations: 150_000,
            sample_stride: 20,
            brake_threshold: 1.1,
            accelerate_threshold: 0.95,
            drs_min_straight_length: 300.0,
        }
    }
}

impl SimulationConfig {
    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_sample_stride(mut self, sample_stride: usize) -> Self {
        self.sample_stride = sample_stride;
        self
    }

    pub fn validate(&self) -> SimResult<()> {
        let invalid = |name: &'static str, reason: String| Err(SimError::InvalidConfig { name, reason });

        if !(self.dt.is_finite() && self.dt > 0.0 && self.dt <= MAX_TIMESTEP) {
            return invalid("dt", format!("must lie in (0, {}], got {}", MAX_TIMESTEP, self.dt));
        }
        if self.max_iterations == 0 {
            return invalid("max_iterations", "must be at least 1".to_string());
        }
        if self.sample_stride == 0 {
            return invalid("sample_stride", "must be at least 1".to_string());
        }
        if !(self.accelerate_threshold.is_finite() && self.accelerate_threshold > 0.0) {
            return invalid(
                "accelerate_threshold",
                format!("must be finite and > 0, got {}", self.accelerate_threshold),
            );
        }
        if !(self.brake_threshold.is_finite() && self.brake_threshold > self.accelerate_threshold) {
            return invalid(
                "brake_threshold",
                format!(
                    "must exceed accelerate_threshold ({}), got {}",
                    self.accelerate_threshold, self.brake_threshold
                ),
            );
        }
        if !(self.drs_min_straight_length.is_finite() && self.drs_min_straight_length >= 0.0) {
            return invalid(
                "drs_min_straight_length",
                format!("must be finite and >= 0, got {}", self.drs_min_straight_length),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_timestep_outside_bounds() {
        assert!(SimulationConfig::default().with_dt(0.0).validate().is_err());
        assert!(SimulationConfig::default().with_dt(0.1).validate().is_err());
        assert!(SimulationConfig::default().with_dt(f64::NAN).validate().is_err());
        assert!(SimulationConfig::default().with_dt(0.01).validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_counts() {
        assert!(SimulationConfig::default().with_max_iterations(0).validate().is_err());
        assert!(SimulationConfig::default().with_sample_stride(0).validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let config = SimulationConfig { brake_threshold: 0.9, accelerate_threshold: 0.95, ..Default::default() };
        match config.validate() {
            Err(SimError::InvalidConfig { name, .. }) => assert_eq!(name, "brake_threshold"),
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
        let config = SimulationConfig { accelerate_threshold: 0.0, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimulationConfig = serde_json::from_str(r#"{"dt": 0.01, "sample_stride": 1}"#).unwrap();
        assert_eq!(config.dt, 0.01);
        assert_eq!(config.sample_stride, 1);
        assert_eq!(config.max_iterations, 150_000);
    }
}
