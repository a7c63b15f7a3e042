//! Tire and brake temperature tracking.
//!
//! Temperatures follow the control mode of each step:
//! - braking heats the brakes and the tires, front more than rear
//! - accelerating heats the tires, rear more than front, and cools the brakes
//! - coasting cools everything
//!
//! Grip falls off on either side of the optimal tire temperature, and brake
//! efficiency on either side of the optimal brake temperature.

use log::trace;
use serde::{Deserialize, Serialize};
use simcore::error::ensure_positive;
use simcore::{ControlMode, Model, SimContext, SimError, SimResult, VehicleExtension};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermalConstants {
    pub tire_optimal_temp: f64,
    pub tire_initial_temp: f64,
    pub tire_max_temp: f64,
    pub tire_min_temp: f64,
    /// °C per second of hard use.
    pub tire_heating_rate: f64,
    /// °C per second.
    pub tire_cooling_rate: f64,

    pub brake_initial_temp: f64,
    pub brake_optimal_temp: f64,
    pub brake_max_temp: f64,
    pub brake_min_temp: f64,
    pub brake_heating_rate: f64,
    pub brake_cooling_rate: f64,
}

impl Default for ThermalConstants {
    fn default() -> Self {
        ThermalConstants {
            tire_optimal_temp: 90.0,
            tire_initial_temp: 40.0,
            tire_max_temp: 130.0,
            tire_min_temp: 30.0,
            tire_heating_rate: 2.5,
            tire_cooling_rate: 0.5,
            brake_initial_temp: 200.0,
            brake_optimal_temp: 400.0,
            brake_max_temp: 800.0,
            brake_min_temp: 150.0,
            brake_heating_rate: 50.0,
            brake_cooling_rate: 8.0,
        }
    }
}

impl ThermalConstants {
    /// Rates must be positive and each range ordered `min < optimal < max`.
    pub fn validate(&self) -> SimResult<()> {
        ensure_positive("tire_optimal_temp", self.tire_optimal_temp)?;
        ensure_positive("tire_heating_rate", self.tire_heating_rate)?;
        ensure_positive("tire_cooling_rate", self.tire_cooling_rate)?;
        ensure_positive("brake_optimal_temp", self.brake_optimal_temp)?;
        ensure_positive("brake_heating_rate", self.brake_heating_rate)?;
        ensure_positive("brake_cooling_rate", self.brake_cooling_rate)?;

        let temps = [
            ("tire_initial_temp", self.tire_initial_temp),
            ("tire_max_temp", self.tire_max_temp),
            ("tire_min_temp", self.tire_min_temp),
            ("brake_initial_temp", self.brake_initial_temp),
            ("brake_max_temp", self.brake_max_temp),
            ("brake_min_temp", self.brake_min_temp),
        ];
        if let Some(&(name, value)) = temps.iter().find(|(_, value)| !value.is_finite()) {
            return Err(SimError::InvalidParameter { name, value, reason: "must be finite" });
        }

        if self.tire_min_temp >= self.tire_optimal_temp {
            return Err(SimError::InvalidParameter {
                name: "tire_min_temp",
                value: self.tire_min_temp,
                reason: "must be below tire_optimal_temp",
            });
        }
        if self.tire_max_temp <= self.tire_optimal_temp {
            return Err(SimError::InvalidParameter {
                name: "tire_max_temp",
                value: self.tire_max_temp,
                reason: "must be above tire_optimal_temp",
            });
        }
        if self.brake_min_temp >= self.brake_optimal_temp {
            return Err(SimError::InvalidParameter {
                name: "brake_min_temp",
                value: self.brake_min_temp,
                reason: "must be below brake_optimal_temp",
            });
        }
        if self.brake_max_temp <= self.brake_optimal_temp {
            return Err(SimError::InvalidParameter {
                name: "brake_max_temp",
                value: self.brake_max_temp,
                reason: "must be above brake_optimal_temp",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ThermalModel {
    constants: ThermalConstants,
    tire_temp_front: f64,
    tire_temp_rear: f64,
    brake_temp: f64,
}

impl ThermalModel {
    pub fn new(constants: ThermalConstants) -> SimResult<Self> {
        constants.validate()?;
        Ok(ThermalModel::at_initial_temps(constants))
    }

    fn at_initial_temps(constants: ThermalConstants) -> Self {
        ThermalModel {
            constants,
            tire_temp_front: constants.tire_initial_temp,
            tire_temp_rear: constants.tire_initial_temp,
            brake_temp: constants.brake_initial_temp,
        }
    }

    pub fn constants(&self) -> &ThermalConstants {
        &self.constants
    }

    pub fn tire_temp_front(&self) -> f64 {
        self.tire_temp_front
    }

    pub fn tire_temp_rear(&self) -> f64 {
        self.tire_temp_rear
    }

    pub fn brake_temp(&self) -> f64 {
        self.brake_temp
    }

    /// Grip relative to a tire at its optimal temperature, in [0.65, 1].
    pub fn tire_grip(&self, temp: f64) -> f64 {
        let c = &self.constants;
        let grip = if temp < c.tire_optimal_temp {
            0.70 + 0.30 * (temp / c.tire_optimal_temp)
        } else {
            let overheat = (temp - c.tire_optimal_temp) / (c.tire_max_temp - c.tire_optimal_temp);
            1.0 - 0.25 * overheat
        };
        grip.clamp(0.65, 1.0)
    }

    /// Brake efficiency in [0.70, 1].
    pub fn brake_efficiency(&self, temp: f64) -> f64 {
        let c = &self.constants;
        let efficiency = if temp < c.brake_optimal_temp {
            0.75 + 0.25 * (temp / c.brake_optimal_temp)
        } else {
            let fade = (temp - c.brake_optimal_temp) / (c.brake_max_temp - c.brake_optimal_temp);
            1.0 - 0.30 * fade
        };
        efficiency.clamp(0.70, 1.0)
    }
}

impl Default for ThermalModel {
    fn default() -> Self {
        ThermalModel::at_initial_temps(ThermalConstants::default())
    }
}

impl Model for ThermalModel {
    fn reset(&mut self) {
        *self = ThermalModel::at_initial_temps(self.constants);
    }
}

impl VehicleExtension for ThermalModel {
    /// The colder (or hotter) axle bounds the usable grip.
    fn grip_multiplier(&self) -> f64 {
        self.tire_grip(self.tire_temp_front).min(self.tire_grip(self.tire_temp_rear))
    }

    fn brake_multiplier(&self) -> f64 {
        self.brake_efficiency(self.brake_temp)
    }

    fn step_extension(&mut self, ctx: SimContext, mode: ControlMode) {
        let c = self.constants;
        let dt = ctx.dt;

        match mode {
            ControlMode::Braking => {
                self.brake_temp += c.brake_heating_rate * dt;
                self.tire_temp_front += c.tire_heating_rate * dt * 0.8;
                self.tire_temp_rear += c.tire_heating_rate * dt * 0.5;
            }
            ControlMode::Accelerating => {
                self.tire_temp_rear += c.tire_heating_rate * dt * 0.6;
                self.tire_temp_front += c.tire_heating_rate * dt * 0.2;
                self.brake_temp -= c.brake_cooling_rate * dt;
            }
            ControlMode::Coasting => {
                self.tire_temp_front -= c.tire_cooling_rate * dt;
                self.tire_temp_rear -= c.tire_cooling_rate * dt;
                self.brake_temp -= c.brake_cooling_rate * dt;
            }
        }

        self.tire_temp_front = self.tire_temp_front.clamp(c.tire_min_temp, c.tire_max_temp);
        self.tire_temp_rear = self.tire_temp_rear.clamp(c.tire_min_temp, c.tire_max_temp);
        self.brake_temp = self.brake_temp.clamp(c.brake_min_temp, c.brake_max_temp);

        trace!(
            "t={:.2} tires {:.1}/{:.1} C brakes {:.1} C",
            ctx.t, self.tire_temp_front, self.tire_temp_rear, self.brake_temp
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> SimContext {
        SimContext { dt: 0.05, t: 0.0 }
    }

    #[test]
    fn test_starts_cold() {
        let model = ThermalModel::default();
        assert_eq!(model.tire_temp_front(), 40.0);
        assert_eq!(model.brake_temp(), 200.0);
        // 0.70 + 0.30 * 40/90
        assert!((model.grip_multiplier() - (0.70 + 0.30 * 40.0 / 90.0)).abs() < 1e-12);
        assert!((model.brake_multiplier() - 0.875).abs() < 1e-12);
    }

    #[test]
    fn test_grip_peaks_at_optimal_temperature() {
        let model = ThermalModel::default();
        assert!((model.tire_grip(90.0) - 1.0).abs() < 1e-12);
        assert!(model.tire_grip(60.0) < 1.0);
        assert!(model.tire_grip(120.0) < 1.0);
        assert!((model.tire_grip(130.0) - 0.75).abs() < 1e-12);
        assert!(model.tire_grip(-500.0) >= 0.65);
    }

    #[test]
    fn test_brake_fade() {
        let model = ThermalModel::default();
        assert!((model.brake_efficiency(400.0) - 1.0).abs() < 1e-12);
        assert!((model.brake_efficiency(800.0) - 0.70).abs() < 1e-12);
        assert!(model.brake_efficiency(1200.0) >= 0.70);
    }

    #[test]
    fn test_braking_heats_front_more_than_rear() {
        let mut model = ThermalModel::default();
        for _ in 0..20 {
            model.step_extension(ctx(), ControlMode::Braking);
        }
        assert!(model.tire_temp_front() > model.tire_temp_rear());
        assert!((model.brake_temp() - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_accelerating_heats_rear_and_cools_brakes() {
        let mut model = ThermalModel::default();
        for _ in 0..20 {
            model.step_extension(ctx(), ControlMode::Accelerating);
        }
        assert!(model.tire_temp_rear() > model.tire_temp_front());
        assert!(model.brake_temp() < 200.0);
    }

    #[test]
    fn test_temperatures_are_clamped() {
        let mut model = ThermalModel::default();
        for _ in 0..100_000 {
            model.step_extension(ctx(), ControlMode::Coasting);
        }
        assert_eq!(model.tire_temp_front(), 30.0);
        assert_eq!(model.brake_temp(), 150.0);

        for _ in 0..100_000 {
            model.step_extension(ctx(), ControlMode::Braking);
        }
        assert_eq!(model.tire_temp_front(), 130.0);
        assert_eq!(model.brake_temp(), 800.0);
    }

    #[test]
    fn test_default_constants_are_valid() {
        assert!(ThermalConstants::default().validate().is_ok());
        assert!(ThermalModel::new(ThermalConstants::default()).is_ok());
    }

    #[test]
    fn test_inverted_tire_range_is_rejected() {
        let constants = ThermalConstants { tire_min_temp: 140.0, ..Default::default() };
        assert!(matches!(
            ThermalModel::new(constants),
            Err(SimError::InvalidParameter { name: "tire_min_temp", .. })
        ));
    }

    #[test]
    fn test_max_at_optimal_is_rejected() {
        let constants = ThermalConstants { tire_optimal_temp: 130.0, tire_max_temp: 130.0, ..Default::default() };
        assert!(matches!(
            ThermalModel::new(constants),
            Err(SimError::InvalidParameter { name: "tire_max_temp", .. })
        ));

        let constants = ThermalConstants { brake_max_temp: 400.0, ..Default::default() };
        assert!(matches!(
            ThermalModel::new(constants),
            Err(SimError::InvalidParameter { name: "brake_max_temp", .. })
        ));
    }

    #[test]
    fn test_non_finite_and_non_positive_constants_are_rejected() {
        let constants = ThermalConstants { brake_initial_temp: f64::NAN, ..Default::default() };
        assert!(matches!(
            constants.validate(),
            Err(SimError::InvalidParameter { name: "brake_initial_temp", .. })
        ));

        let constants = ThermalConstants { tire_cooling_rate: 0.0, ..Default::default() };
        assert!(matches!(
            constants.validate(),
            Err(SimError::InvalidParameter { name: "tire_cooling_rate", .. })
        ));
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut model = ThermalModel::default();
        model.step_extension(ctx(), ControlMode::Braking);
        model.reset();
        assert_eq!(model.tire_temp_front(), 40.0);
        assert_eq!(model.brake_temp(), 200.0);
    }
}
