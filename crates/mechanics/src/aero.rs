//! Quadratic drag and downforce.

use simcore::AeroForces;

use crate::vehicle::VehicleParameters;

/// `½ ρ C A v²`
pub fn dynamic_force(air_density: f64, coefficient: f64, area: f64, speed: f64) -> f64 {
    0.5 * air_density * coefficient * area * speed * speed
}

/// Drag and per-axle downforce at `speed`. With DRS open, drag and the rear
/// downforce coefficient both drop to their DRS values; the front is unaffected.
pub fn aero_forces(params: &VehicleParameters, speed: f64, drs_active: bool) -> AeroForces {
    let (drag_coefficient, rear_coefficient) = if drs_active {
        (params.drag_coefficient_drs, params.downforce_coefficient_rear_drs)
    } else {
        (params.drag_coefficient, params.downforce_coefficient_rear)
    };

    let force = |coefficient: f64| dynamic_force(params.air_density, coefficient, params.frontal_area, speed);
    let downforce_front = force(params.downforce_coefficient_front);
    let downforce_rear = force(rear_coefficient);

    AeroForces {
        drag: force(drag_coefficient),
        downforce_total: downforce_front + downforce_rear,
        downforce_front,
        downforce_rear,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forces_vanish_at_rest() {
        let forces = aero_forces(&VehicleParameters::default(), 0.0, false);
        assert_eq!(forces, AeroForces::default());
    }

    #[test]
    fn test_drag_at_known_speed() {
        let params = VehicleParameters::default();
        let forces = aero_forces(&params, 80.0, false);
        // 0.5 * 1.225 * 0.9 * 1.5 * 6400
        assert!((forces.drag - 5292.0).abs() < 1e-9);
        assert!((forces.downforce_total - (forces.downforce_front + forces.downforce_rear)).abs() < 1e-9);
    }

    #[test]
    fn test_quadratic_in_speed() {
        let params = VehicleParameters::default();
        let slow = aero_forces(&params, 30.0, false);
        let fast = aero_forces(&params, 60.0, false);
        assert!((fast.drag - 4.0 * slow.drag).abs() < 1e-9);
        assert!((fast.downforce_total - 4.0 * slow.downforce_total).abs() < 1e-9);
    }

    #[test]
    fn test_drs_reduces_drag_and_rear_downforce() {
        let params = VehicleParameters::default();
        for speed in [10.0, 40.0, 70.0, 95.0] {
            let closed = aero_forces(&params, speed, false);
            let open = aero_forces(&params, speed, true);
            assert!(open.drag < closed.drag);
            assert!(open.downforce_rear < closed.downforce_rear);
            assert_eq!(open.downforce_front, closed.downforce_front);
        }
    }
}
