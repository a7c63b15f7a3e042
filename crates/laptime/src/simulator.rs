//! Fixed-timestep lap integration.
//!
//! Each step resolves the segment under the car, evaluates the force balance
//! for one of three control modes and advances the state with a
//! semi-implicit Euler step:
//!
//! - **Braking** when speed exceeds the segment limit by the brake threshold
//! - **Accelerating** while speed is below the limit by the accelerate threshold
//! - **Coasting** in between, so the car does not chatter on the limit
//!
//! The car starts from rest at distance zero and the lap ends when the
//! finish line is crossed or the iteration cap is reached.

use log::{debug, info, warn};
use serde::Serialize;
use simcore::{
    ControlMode, IntegrationState, Integrator, SemiImplicitEuler, SimContext, SimResult, SpeedLimit,
    VehicleExtension, VehicleModel,
};
use track::Track;

use crate::config::SimulationConfig;
use crate::telemetry::{Telemetry, TelemetrySample};

/// Outcome of one lap. A lap that hit the iteration cap is still returned,
/// with `converged == false` and whatever was covered until then.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LapResult {
    /// s
    pub lap_time: f64,
    /// m
    pub distance: f64,
    pub iterations: usize,
    pub converged: bool,
    pub telemetry: Telemetry,
}

impl LapResult {
    /// m/s
    pub fn average_speed(&self) -> f64 {
        if self.lap_time > 0.0 { self.distance / self.lap_time } else { 0.0 }
    }
}

/// Runs laps of one vehicle around one track.
pub struct LapSimulator<'a, V: VehicleModel + ?Sized> {
    vehicle: &'a V,
    track: &'a Track,
    config: SimulationConfig,
    integrator: SemiImplicitEuler,
    extension: Option<Box<dyn VehicleExtension>>,
}

impl<'a, V: VehicleModel + ?Sized> LapSimulator<'a, V> {
    pub fn new(vehicle: &'a V, track: &'a Track, config: SimulationConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(LapSimulator { vehicle, track, config, integrator: SemiImplicitEuler, extension: None })
    }

    /// Layers `extension` over the vehicle for every lap this simulator runs.
    pub fn with_extension(mut self, extension: Box<dyn VehicleExtension>) -> Self {
        self.extension = Some(extension);
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    fn control(&self, limit: SpeedLimit, speed: f64) -> ControlMode {
        if limit.is_unbounded() {
            ControlMode::Accelerating
        } else if limit.exceeded_by(speed, self.config.brake_threshold) {
            ControlMode::Braking
        } else if limit.permits(speed, self.config.accelerate_threshold) {
            ControlMode::Accelerating
        } else {
            ControlMode::Coasting
        }
    }

    /// Integrates one lap from a standing start. Any extension is reset
    /// first, so repeated runs give identical results.
    pub fn run(&mut self) -> LapResult {
        let vehicle = self.vehicle;
        let track = self.track;
        let config = &self.config;
        let total_length = track.total_length();
        let gravity = vehicle.gravity();

        debug!(
            "simulating '{}' ({:.0} m): dt={} s, max_iterations={}, sample_stride={}",
            track.name(),
            total_length,
            config.dt,
            config.max_iterations,
            config.sample_stride
        );

        if let Some(extension) = self.extension.as_mut() {
            extension.reset();
        }

        let mut state = IntegrationState::default();
        let mut telemetry = Telemetry::with_capacity(config.max_iterations.min(1 << 16) / config.sample_stride);
        let mut iterations = 0;

        while state.distance < total_length && iterations < config.max_iterations {
            iterations += 1;

            let index = track.segment_index_at(state.distance);
            let segment = &track.segments()[index];
            let speed = state.velocity;
            let mass = vehicle.current_mass(state.distance);

            let drs_active = segment.length >= config.drs_min_straight_length
                && vehicle.can_use_drs(segment.segment_type, speed);
            let aero = vehicle.aero_forces(speed, drs_active);
            let loads = vehicle.axle_loads(0.0, 0.0, &aero, mass);

            let (grip, brake_efficiency) = match self.extension.as_ref() {
                Some(extension) => (extension.grip_multiplier(), extension.brake_multiplier()),
                None => (1.0, 1.0),
            };

            let limit = vehicle
                .corner_speed_limit(segment.geometry, aero.downforce_total, mass)
                .scaled(grip.sqrt())
                .capped(segment.speed_limit);
            let mode = self.control(limit, speed);

            let net_force = match mode {
                ControlMode::Braking => {
                    -(vehicle.max_brake_force(loads.front, loads.rear) * grip * brake_efficiency + aero.drag)
                }
                ControlMode::Accelerating => {
                    let traction = vehicle.tire_limited_force(loads.rear) * grip;
                    vehicle.power_limited_force(speed).min(traction) - aero.drag
                }
                ControlMode::Coasting => -aero.drag,
            } - vehicle.rolling_resistance(mass);
            let acceleration = net_force / mass;

            let ctx = SimContext { dt: config.dt, t: state.time };
            self.integrator.step(&ctx, &mut state, acceleration);
            if let Some(extension) = self.extension.as_mut() {
                extension.step_extension(ctx, mode);
            }

            if iterations % config.sample_stride == 0 {
                telemetry.push(TelemetrySample {
                    time: state.time,
                    distance: state.distance,
                    speed: state.velocity,
                    acceleration,
                    drag: aero.drag,
                    downforce: aero.downforce_total,
                    throttle: mode.throttle(),
                    brake: mode.brake(),
                    lateral_g: segment.geometry.lateral_acceleration(state.velocity) / gravity,
                    longitudinal_g: acceleration / gravity,
                    drs_active,
                    segment_index: index,
                    mode,
                });
            }
        }

        let converged = state.distance >= total_length;
        if converged {
            info!("'{}' lap: {:.3} s in {} steps", track.name(), state.time, iterations);
        } else {
            warn!(
                "'{}' lap did not finish within {} steps: {:.1} of {:.1} m after {:.3} s",
                track.name(),
                config.max_iterations,
                state.distance,
                total_length,
                state.time
            );
        }

        LapResult { lap_time: state.time, distance: state.distance, iterations, converged, telemetry }
    }
}

/// Runs a single lap of `vehicle` around `track`.
pub fn simulate_lap<V: VehicleModel + ?Sized>(
    vehicle: &V,
    track: &Track,
    config: &SimulationConfig,
) -> SimResult<LapResult> {
    Ok(LapSimulator::new(vehicle, track, config.clone())?.run())
}
