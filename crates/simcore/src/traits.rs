use serde::{Deserialize, Serialize};

// Geometry

/// Plan-view shape of a track segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentGeometry {
    Straight,
    /// Only the magnitude of the radius is used; the sign (turn direction)
    /// carries no meaning for a point-mass model.
    Corner { radius: f64 },
}

impl SegmentGeometry {
    pub fn corner(radius: f64) -> Self {
        SegmentGeometry::Corner { radius }
    }

    pub fn is_straight(&self) -> bool {
        matches!(self, SegmentGeometry::Straight)
    }

    /// Absolute corner radius, `None` for a straight.
    pub fn radius(&self) -> Option<f64> {
        match self {
            SegmentGeometry::Straight => None,
            SegmentGeometry::Corner { radius } => Some(radius.abs()),
        }
    }

    /// Centripetal acceleration needed to hold `speed` through this segment.
    pub fn lateral_acceleration(&self, speed: f64) -> f64 {
        match self.radius() {
            Some(radius) if radius > 0.0 => speed * speed / radius,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentType {
    Straight,
    SlowCorner,
    MediumCorner,
    FastCorner,
    Chicane,
}

impl SegmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentType::Straight => "straight",
            SegmentType::SlowCorner => "slow_corner",
            SegmentType::MediumCorner => "medium_corner",
            SegmentType::FastCorner => "fast_corner",
            SegmentType::Chicane => "chicane",
        }
    }
}

/// Maximum speed a segment allows.
///
/// A straight is `Unbounded` rather than a numeric infinity so that control
/// decisions never compare against a sentinel value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpeedLimit {
    Unbounded,
    Limited(f64),
}

impl SpeedLimit {
    pub fn value(&self) -> Option<f64> {
        match self {
            SpeedLimit::Unbounded => None,
            SpeedLimit::Limited(limit) => Some(*limit),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, SpeedLimit::Unbounded)
    }

    pub fn scaled(self, factor: f64) -> Self {
        match self {
            SpeedLimit::Unbounded => SpeedLimit::Unbounded,
            SpeedLimit::Limited(limit) => SpeedLimit::Limited(limit * factor),
        }
    }

    /// The tighter of `self` and an optional hard cap.
    pub fn capped(self, cap: Option<f64>) -> Self {
        match (self, cap) {
            (limit, None) => limit,
            (SpeedLimit::Unbounded, Some(cap)) => SpeedLimit::Limited(cap),
            (SpeedLimit::Limited(limit), Some(cap)) => SpeedLimit::Limited(limit.min(cap)),
        }
    }

    /// `speed > factor * limit`; never true for an unbounded limit.
    pub fn exceeded_by(&self, speed: f64, factor: f64) -> bool {
        match self {
            SpeedLimit::Unbounded => false,
            SpeedLimit::Limited(limit) => speed > factor * limit,
        }
    }

    /// `speed < factor * limit`; always true for an unbounded limit.
    pub fn permits(&self, speed: f64, factor: f64) -> bool {
        match self {
            SpeedLimit::Unbounded => true,
            SpeedLimit::Limited(limit) => speed < factor * limit,
        }
    }
}

// Force balance

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AeroForces {
    pub drag: f64,
    pub downforce_total: f64,
    pub downforce_front: f64,
    pub downforce_rear: f64,
}

/// Normal loads per axle in N.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AxleLoads {
    pub front: f64,
    pub rear: f64,
    /// Left/right load shift from cornering; does not change `front + rear`.
    pub lateral_transfer: f64,
}

impl AxleLoads {
    pub fn total(&self) -> f64 {
        self.front + self.rear
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlMode {
    Braking,
    #[default]
    Accelerating,
    Coasting,
}

impl ControlMode {
    pub fn throttle(&self) -> f64 {
        match self {
            ControlMode::Accelerating => 1.0,
            _ => 0.0,
        }
    }

    pub fn brake(&self) -> f64 {
        match self {
            ControlMode::Braking => 1.0,
            _ => 0.0,
        }
    }
}

// Integration state

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IntegrationState {
    pub time: f64,
    pub distance: f64,
    pub velocity: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct SimContext {
    pub dt: f64,
    pub t: f64,
}

// Models

pub trait Model {
    fn reset(&mut self);
}

/// Force model every simulated car provides.
///
/// All methods are pure: the same inputs always give the same outputs, and
/// nothing about the car changes while a lap is integrated.
pub trait VehicleModel {
    fn gravity(&self) -> f64;

    /// Vehicle mass after covering `distance` metres on the current fuel load.
    fn current_mass(&self, distance: f64) -> f64;

    fn aero_forces(&self, speed: f64, drs_active: bool) -> AeroForces;

    fn can_use_drs(&self, segment_type: SegmentType, speed: f64) -> bool;

    fn corner_speed_limit(&self, geometry: SegmentGeometry, downforce_total: f64, mass: f64) -> SpeedLimit;

    fn power_limited_force(&self, speed: f64) -> f64;

    fn tire_limited_force(&self, rear_load: f64) -> f64;

    /// Tractive force at the rear axle, bounded by the tire.
    fn max_drive_force(&self, speed: f64, rear_load: f64) -> f64 {
        self.power_limited_force(speed).min(self.tire_limited_force(rear_load))
    }

    fn max_brake_force(&self, front_load: f64, rear_load: f64) -> f64;

    fn axle_loads(&self, longitudinal_accel: f64, lateral_accel: f64, aero: &AeroForces, mass: f64) -> AxleLoads;

    fn rolling_resistance(&self, mass: f64) -> f64;
}

/// Optional behaviour layered over a [`VehicleModel`] for the length of one
/// lap (tire temperature, brake fade, ...).
pub trait VehicleExtension: Model + Send {
    /// Scales every tire-limited force.
    fn grip_multiplier(&self) -> f64 {
        1.0
    }

    /// Scales the brake force on top of [`VehicleExtension::grip_multiplier`].
    fn brake_multiplier(&self) -> f64 {
        1.0
    }

    fn step_extension(&mut self, ctx: SimContext, mode: ControlMode);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_limit_always_permits() {
        let limit = SpeedLimit::Unbounded;
        assert!(limit.permits(1.0e6, 0.95));
        assert!(!limit.exceeded_by(1.0e6, 1.1));
        assert_eq!(limit.value(), None);
    }

    #[test]
    fn test_limited_thresholds() {
        let limit = SpeedLimit::Limited(50.0);
        assert!(limit.exceeded_by(56.0, 1.1));
        assert!(!limit.exceeded_by(55.0, 1.1));
        assert!(limit.permits(47.0, 0.95));
        assert!(!limit.permits(48.0, 0.95));
    }

    #[test]
    fn test_capped_takes_tighter_limit() {
        assert_eq!(SpeedLimit::Unbounded.capped(Some(20.0)), SpeedLimit::Limited(20.0));
        assert_eq!(SpeedLimit::Limited(30.0).capped(Some(20.0)), SpeedLimit::Limited(20.0));
        assert_eq!(SpeedLimit::Limited(10.0).capped(Some(20.0)), SpeedLimit::Limited(10.0));
        assert_eq!(SpeedLimit::Limited(10.0).capped(None), SpeedLimit::Limited(10.0));
    }

    #[test]
    fn test_corner_radius_ignores_sign() {
        assert_eq!(SegmentGeometry::corner(-70.0).radius(), Some(70.0));
        assert_eq!(SegmentGeometry::Straight.radius(), None);
        assert!((SegmentGeometry::corner(-50.0).lateral_acceleration(10.0) - 2.0).abs() < 1e-12);
        assert_eq!(SegmentGeometry::Straight.lateral_acceleration(80.0), 0.0);
    }

    #[test]
    fn test_geometry_serde_tagging() {
        let json = serde_json::to_string(&SegmentGeometry::corner(35.0)).unwrap();
        assert_eq!(json, r#"{"kind":"corner","radius":35.0}"#);
        let straight: SegmentGeometry = serde_json::from_str(r#"{"kind":"straight"}"#).unwrap();
        assert!(straight.is_straight());
    }
}
