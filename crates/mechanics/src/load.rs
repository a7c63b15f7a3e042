//! Quasi-static axle loads.

use simcore::{AeroForces, AxleLoads};

use crate::vehicle::VehicleParameters;

/// Static weight split, shifted rearwards under acceleration by
/// `m·a·h / L`, plus each axle's downforce. Neither axle goes negative.
///
/// `lateral_transfer` is reported for telemetry only; it moves load between
/// sides, not between axles.
pub fn axle_loads(
    params: &VehicleParameters,
    longitudinal_accel: f64,
    lateral_accel: f64,
    aero: &AeroForces,
    mass: f64,
) -> AxleLoads {
    let weight = mass * params.gravity;
    let static_front = weight * params.weight_dist_front;
    let static_rear = weight - static_front;

    let longitudinal_transfer = mass * longitudinal_accel * params.cg_height / params.wheelbase;

    AxleLoads {
        front: (static_front - longitudinal_transfer + aero.downforce_front).max(0.0),
        rear: (static_rear + longitudinal_transfer + aero.downforce_rear).max(0.0),
        lateral_transfer: mass * lateral_accel * params.cg_height / params.track_width,
    }
}
