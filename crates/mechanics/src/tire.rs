use nalgebra as na;
use serde::{Deserialize, Serialize};

/// Magic Formula shape factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PacejkaConstants {
    /// Stiffness factor.
    pub b: f64,
    /// Shape factor.
    pub c: f64,
    /// Peak factor, applied on top of `mu_peak`.
    pub d: f64,
    /// Curvature factor.
    pub e: f64,
}

impl Default for PacejkaConstants {
    fn default() -> Self {
        PacejkaConstants { b: 10.0, c: 1.9, d: 1.0, e: 0.97 }
    }
}

/// Longitudinal and lateral force of one contact patch (N).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TireForce {
    pub longitudinal: f64,
    pub lateral: f64,
}

impl TireForce {
    pub fn magnitude(&self) -> f64 {
        self.longitudinal.hypot(self.lateral)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TireModel {
    pub mu_peak: f64,
    pub constants: PacejkaConstants,
    /// Fractional loss of friction per kN above `reference_load`.
    pub load_sensitivity: f64,
    /// N
    pub reference_load: f64,
}

impl Default for TireModel {
    fn default() -> Self {
        TireModel::with_mu_peak(1.8)
    }
}

impl TireModel {
    pub fn with_mu_peak(mu_peak: f64) -> Self {
        TireModel { mu_peak, constants: PacejkaConstants::default(), load_sensitivity: 0.02, reference_load: 4000.0 }
    }

    /// Effective friction coefficient at `normal_load`. Heavily loaded tires
    /// lose grip; lightly loaded ones never exceed `mu_peak`.
    pub fn mu_at_load(&self, normal_load: f64) -> f64 {
        let excess_kn = ((normal_load - self.reference_load) / 1000.0).max(0.0);
        (self.mu_peak * (1.0 - self.load_sensitivity * excess_kn)).max(0.0)
    }

    fn magic_formula(&self, slip: f64) -> f64 {
        let PacejkaConstants { b, c, d, e } = self.constants;
        let bx = b * slip;
        d * (c * (bx - e * (bx - bx.atan())).atan()).sin()
    }

    /// Pure longitudinal force for `slip_ratio` (dimensionless).
    pub fn longitudinal_force(&self, slip_ratio: f64, normal_load: f64) -> f64 {
        let load = normal_load.max(0.0);
        self.mu_at_load(load) * load * self.magic_formula(slip_ratio)
    }

    /// Pure lateral force for `slip_angle` (rad).
    pub fn lateral_force(&self, slip_angle: f64, normal_load: f64) -> f64 {
        let load = normal_load.max(0.0);
        self.mu_at_load(load) * load * self.magic_formula(slip_angle)
    }

    /// Both pure-slip forces, scaled back onto the friction circle when their
    /// combination would exceed it.
    pub fn combined_force(&self, slip_ratio: f64, slip_angle: f64, normal_load: f64) -> TireForce {
        let load = normal_load.max(0.0);
        let pure = na::Vector2::new(self.longitudinal_force(slip_ratio, load), self.lateral_force(slip_angle, load));
        let scaled = scale_to_friction_circle(pure, self.mu_at_load(load) * load);
        TireForce { longitudinal: scaled.x, lateral: scaled.y }
    }
}

fn scale_to_friction_circle(force: na::Vector2<f64>, limit: f64) -> na::Vector2<f64> {
    if limit <= 0.0 {
        return na::Vector2::zeros();
    }
    let utilisation = force.norm() / limit;
    if utilisation > 1.0 { force / utilisation } else { force }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand::rngs::StdRng;

    #[test]
    fn test_zero_slip_zero_force() {
        let tire = TireModel::default();
        assert_eq!(tire.longitudinal_force(0.0, 4000.0), 0.0);
        assert_eq!(tire.lateral_force(0.0, 4000.0), 0.0);
    }

    #[test]
    fn test_force_is_odd_in_slip() {
        let tire = TireModel::default();
        let forward = tire.longitudinal_force(0.08, 3500.0);
        let backward = tire.longitudinal_force(-0.08, 3500.0);
        assert!(forward > 0.0);
        assert!((forward + backward).abs() < 1e-9);
    }

    #[test]
    fn test_mu_never_exceeds_peak() {
        let tire = TireModel::default();
        for load in [0.0, 500.0, 2000.0, 4000.0, 8000.0, 20_000.0] {
            assert!(tire.mu_at_load(load) <= tire.mu_peak);
            assert!(tire.mu_at_load(load) >= 0.0);
        }
        assert!(tire.mu_at_load(10_000.0) < tire.mu_at_load(4000.0));
    }

    #[test]
    fn test_no_load_no_force() {
        let tire = TireModel::default();
        let force = tire.combined_force(0.1, 0.1, 0.0);
        assert_eq!(force, TireForce::default());
        let force = tire.combined_force(0.1, 0.1, -300.0);
        assert_eq!(force.magnitude(), 0.0);
    }

    #[test]
    fn test_combined_force_stays_in_friction_circle() {
        let tire = TireModel::default();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..500 {
            let slip_ratio = rng.gen_range(-0.5..0.5);
            let slip_angle = rng.gen_range(-0.4..0.4);
            let load = rng.gen_range(0.0..12_000.0);

            let force = tire.combined_force(slip_ratio, slip_angle, load);
            let limit = tire.mu_at_load(load) * load;
            assert!(force.magnitude() <= limit + 1e-6, "{:?} exceeds {}", force, limit);
        }
    }

    #[test]
    fn test_small_slip_is_not_scaled() {
        let tire = TireModel::default();
        let force = tire.combined_force(0.005, 0.0, 4000.0);
        assert!((force.longitudinal - tire.longitudinal_force(0.005, 4000.0)).abs() < 1e-9);
        assert_eq!(force.lateral, 0.0);
    }
}
