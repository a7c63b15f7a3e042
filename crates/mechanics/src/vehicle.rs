//! Vehicle parameters and the canonical [`Vehicle`] force model.
//!
//! Parameter sweeps build a fresh [`VehicleParameters`] per trial through the
//! `with_*` builders; a [`Vehicle`] never changes once constructed.

use serde::{Deserialize, Serialize};
use simcore::error::{ensure_non_negative, ensure_positive};
use simcore::{
    AeroForces, AxleLoads, SegmentGeometry, SegmentType, SimError, SimResult, SpeedLimit, VehicleModel,
};

use crate::tire::{TireForce, TireModel};
use crate::{aero, load, powertrain};

/// Schema version of [`VehicleParameters`].
pub const PARAMETERS_VERSION: u32 = 1;

pub const KMH_PER_MS: f64 = 3.6;

/// Physical description of the car. All quantities are SI unless the field
/// name says otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleParameters {
    pub version: u32,

    /// Car and driver without fuel (kg).
    pub mass_empty: f64,
    /// Fuel on board at the start of the lap (kg).
    pub fuel_load: f64,
    /// Fuel burned per kilometre (kg/km).
    pub fuel_consumption_rate: f64,

    pub drag_coefficient: f64,
    pub drag_coefficient_drs: f64,
    pub downforce_coefficient_front: f64,
    pub downforce_coefficient_rear: f64,
    pub downforce_coefficient_rear_drs: f64,
    /// Reference area for all aero coefficients (m²).
    pub frontal_area: f64,
    /// kg/m³
    pub air_density: f64,

    pub tire_mu_peak: f64,
    pub rolling_resistance: f64,

    /// W
    pub max_power: f64,
    /// Below this speed the power-limited force is replaced by a capped
    /// constant (m/s).
    pub low_speed_threshold: f64,
    /// N
    pub low_speed_force_cap: f64,

    /// Share of the front axle's grip usable for braking.
    pub brake_efficiency_front: f64,
    /// Share of the rear axle's grip usable for braking (brake bias).
    pub brake_efficiency_rear: f64,

    pub wheelbase: f64,
    pub track_width: f64,
    pub cg_height: f64,
    /// Static share of the weight on the front axle, in (0, 1).
    pub weight_dist_front: f64,

    pub drs_min_speed_kmh: f64,
    pub drs_enabled: bool,

    pub gravity: f64,
}

impl Default for VehicleParameters {
    fn default() -> Self {
        VehicleParameters {
            version: PARAMETERS_VERSION,
            mass_empty: 798.0,
            fuel_load: 10.0,
            fuel_consumption_rate: 1.8,
            drag_coefficient: 0.90,
            drag_coefficient_drs: 0.75,
            downforce_coefficient_front: 1.0,
            downforce_coefficient_rear: 1.1,
            downforce_coefficient_rear_drs: 0.8,
            frontal_area: 1.5,
            air_density: 1.225,
            tire_mu_peak: 1.8,
            rolling_resistance: 0.015,
            max_power: 746_000.0,
            low_speed_threshold: 5.0,
            low_speed_force_cap: 10_000.0,
            brake_efficiency_front: 1.0,
            brake_efficiency_rear: 0.7,
            wheelbase: 3.6,
            track_width: 1.8,
            cg_height: 0.35,
            weight_dist_front: 0.45,
            drs_min_speed_kmh: 80.0,
            drs_enabled: true,
            gravity: 9.81,
        }
    }
}

impl VehicleParameters {
    pub fn validate(&self) -> SimResult<()> {
        if self.version != PARAMETERS_VERSION {
            return Err(SimError::UnsupportedVersion { found: self.version, supported: PARAMETERS_VERSION });
        }

        ensure_positive("mass_empty", self.mass_empty)?;
        ensure_non_negative("fuel_load", self.fuel_load)?;
        ensure_non_negative("fuel_consumption_rate", self.fuel_consumption_rate)?;
        ensure_positive("drag_coefficient", self.drag_coefficient)?;
        ensure_positive("drag_coefficient_drs", self.drag_coefficient_drs)?;
        ensure_positive("downforce_coefficient_front", self.downforce_coefficient_front)?;
        ensure_positive("downforce_coefficient_rear", self.downforce_coefficient_rear)?;
        ensure_positive("downforce_coefficient_rear_drs", self.downforce_coefficient_rear_drs)?;
        ensure_positive("frontal_area", self.frontal_area)?;
        ensure_positive("air_density", self.air_density)?;
        ensure_positive("tire_mu_peak", self.tire_mu_peak)?;
        ensure_non_negative("rolling_resistance", self.rolling_resistance)?;
        // Zero power is a legal (if hopeless) car; the lap then ends on the
        // iteration cap.
        ensure_non_negative("max_power", self.max_power)?;
        ensure_positive("low_speed_threshold", self.low_speed_threshold)?;
        ensure_positive("low_speed_force_cap", self.low_speed_force_cap)?;
        ensure_positive("brake_efficiency_front", self.brake_efficiency_front)?;
        ensure_positive("brake_efficiency_rear", self.brake_efficiency_rear)?;
        ensure_positive("wheelbase", self.wheelbase)?;
        ensure_positive("track_width", self.track_width)?;
        ensure_positive("cg_height", self.cg_height)?;
        ensure_non_negative("drs_min_speed_kmh", self.drs_min_speed_kmh)?;
        ensure_positive("gravity", self.gravity)?;

        if !(self.weight_dist_front > 0.0 && self.weight_dist_front < 1.0) {
            return Err(SimError::InvalidParameter {
                name: "weight_dist_front",
                value: self.weight_dist_front,
                reason: "must lie strictly between 0 and 1",
            });
        }
        if self.drag_coefficient_drs >= self.drag_coefficient {
            return Err(SimError::InvalidParameter {
                name: "drag_coefficient_drs",
                value: self.drag_coefficient_drs,
                reason: "must be below drag_coefficient",
            });
        }
        if self.downforce_coefficient_rear_drs >= self.downforce_coefficient_rear {
            return Err(SimError::InvalidParameter {
                name: "downforce_coefficient_rear_drs",
                value: self.downforce_coefficient_rear_drs,
                reason: "must be below downforce_coefficient_rear",
            });
        }
        if self.brake_efficiency_front > 1.0 {
            return Err(SimError::InvalidParameter {
                name: "brake_efficiency_front",
                value: self.brake_efficiency_front,
                reason: "must not exceed 1",
            });
        }
        if self.brake_efficiency_rear >= self.brake_efficiency_front {
            return Err(SimError::InvalidParameter {
                name: "brake_efficiency_rear",
                value: self.brake_efficiency_rear,
                reason: "must be below brake_efficiency_front",
            });
        }
        Ok(())
    }

    pub fn with_max_power(mut self, watts: f64) -> Self {
        self.max_power = watts;
        self
    }

    pub fn with_mass_empty(mut self, kg: f64) -> Self {
        self.mass_empty = kg;
        self
    }

    pub fn with_fuel_load(mut self, kg: f64) -> Self {
        self.fuel_load = kg;
        self
    }

    pub fn with_tire_mu_peak(mut self, mu: f64) -> Self {
        self.tire_mu_peak = mu;
        self
    }

    /// Scales both downforce coefficients (and the DRS rear value).
    pub fn with_downforce_scale(mut self, scale: f64) -> Self {
        self.downforce_coefficient_front *= scale;
        self.downforce_coefficient_rear *= scale;
        self.downforce_coefficient_rear_drs *= scale;
        self
    }

    /// Scales drag, with and without DRS.
    pub fn with_drag_scale(mut self, scale: f64) -> Self {
        self.drag_coefficient *= scale;
        self.drag_coefficient_drs *= scale;
        self
    }

    pub fn with_drs(mut self, enabled: bool) -> Self {
        self.drs_enabled = enabled;
        self
    }
}

/// The canonical vehicle model: validated parameters plus the tire used for
/// combined-slip queries.
#[derive(Debug, Clone)]
pub struct Vehicle {
    params: VehicleParameters,
    tire: TireModel,
}

impl Vehicle {
    pub fn new(params: VehicleParameters) -> SimResult<Self> {
        params.validate()?;
        let tire = TireModel::with_mu_peak(params.tire_mu_peak);
        Ok(Vehicle { params, tire })
    }

    pub fn params(&self) -> &VehicleParameters {
        &self.params
    }

    pub fn tire(&self) -> &TireModel {
        &self.tire
    }

    /// Friction-circle limited tire force for a single contact patch.
    pub fn combined_tire_force(&self, slip_ratio: f64, slip_angle: f64, normal_load: f64) -> TireForce {
        self.tire.combined_force(slip_ratio, slip_angle, normal_load)
    }
}

impl Default for Vehicle {
    fn default() -> Self {
        let params = VehicleParameters::default();
        let tire = TireModel::with_mu_peak(params.tire_mu_peak);
        Vehicle { params, tire }
    }
}

impl VehicleModel for Vehicle {
    fn gravity(&self) -> f64 {
        self.params.gravity
    }

    fn current_mass(&self, distance: f64) -> f64 {
        let fuel_burned = (distance.max(0.0) / 1000.0) * self.params.fuel_consumption_rate;
        self.params.mass_empty + (self.params.fuel_load - fuel_burned).max(0.0)
    }

    fn aero_forces(&self, speed: f64, drs_active: bool) -> AeroForces {
        aero::aero_forces(&self.params, speed, drs_active)
    }

    fn can_use_drs(&self, segment_type: SegmentType, speed: f64) -> bool {
        self.params.drs_enabled
            && segment_type == SegmentType::Straight
            && speed * KMH_PER_MS >= self.params.drs_min_speed_kmh
    }

    fn corner_speed_limit(&self, geometry: SegmentGeometry, downforce_total: f64, mass: f64) -> SpeedLimit {
        match geometry.radius() {
            None => SpeedLimit::Unbounded,
            Some(radius) => {
                let normal_force = mass * self.params.gravity + downforce_total.max(0.0);
                let max_lateral_accel = self.params.tire_mu_peak * normal_force / mass;
                SpeedLimit::Limited((max_lateral_accel * radius).sqrt())
            }
        }
    }

    fn power_limited_force(&self, speed: f64) -> f64 {
        powertrain::power_limited_force(&self.params, speed)
    }

    fn tire_limited_force(&self, rear_load: f64) -> f64 {
        self.params.tire_mu_peak * rear_load.max(0.0)
    }

    fn max_brake_force(&self, front_load: f64, rear_load: f64) -> f64 {
        powertrain::max_brake_force(&self.params, front_load, rear_load)
    }

    fn axle_loads(&self, longitudinal_accel: f64, lateral_accel: f64, aero: &AeroForces, mass: f64) -> AxleLoads {
        load::axle_loads(&self.params, longitudinal_accel, lateral_accel, aero, mass)
    }

    fn rolling_resistance(&self, mass: f64) -> f64 {
        self.params.rolling_resistance * mass * self.params.gravity
    }
}
