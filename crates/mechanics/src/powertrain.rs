//! Drive and brake force envelopes.

use crate::vehicle::VehicleParameters;

/// Force available from `max_power` at `speed`.
///
/// `P / v` diverges at rest, so below `low_speed_threshold` the force is held
/// at `P / threshold`, never more than `low_speed_force_cap`. A car with no
/// power produces no force at any speed.
pub fn power_limited_force(params: &VehicleParameters, speed: f64) -> f64 {
    if speed > params.low_speed_threshold {
        params.max_power / speed
    } else {
        params.low_speed_force_cap.min(params.max_power / params.low_speed_threshold)
    }
}

/// Peak braking force with the rear axle's share reduced by the brake bias.
pub fn max_brake_force(params: &VehicleParameters, front_load: f64, rear_load: f64) -> f64 {
    params.tire_mu_peak
        * (front_load.max(0.0) * params.brake_efficiency_front + rear_load.max(0.0) * params.brake_efficiency_rear)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_limited_above_threshold() {
        let params = VehicleParameters::default();
        assert!((power_limited_force(&params, 50.0) - 746_000.0 / 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_low_speed_force_is_capped() {
        let params = VehicleParameters::default();
        assert_eq!(power_limited_force(&params, 0.0), 10_000.0);
        assert_eq!(power_limited_force(&params, 4.9), 10_000.0);
    }

    #[test]
    fn test_zero_power_gives_zero_force() {
        let params = VehicleParameters::default().with_max_power(0.0);
        for speed in [0.0, 2.0, 10.0, 80.0] {
            assert_eq!(power_limited_force(&params, speed), 0.0);
        }
    }

    #[test]
    fn test_force_decreases_with_speed_above_threshold() {
        let params = VehicleParameters::default();
        let mut previous = f64::INFINITY;
        for speed in [6.0, 10.0, 20.0, 40.0, 80.0] {
            let force = power_limited_force(&params, speed);
            assert!(force <= previous);
            previous = force;
        }
    }

    #[test]
    fn test_brake_bias() {
        let params = VehicleParameters::default();
        let force = max_brake_force(&params, 4000.0, 5000.0);
        assert!((force - 1.8 * (4000.0 + 5000.0 * 0.7)).abs() < 1e-9);
        assert!(max_brake_force(&params, 0.0, 5000.0) < max_brake_force(&params, 5000.0, 0.0));
    }
}
