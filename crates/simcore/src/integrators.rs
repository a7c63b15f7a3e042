use crate::{IntegrationState, SimContext};

/// A generic integration strategy trait.
pub trait Integrator {
    /// Advances the state by one timestep under a constant `acceleration`.
    fn step(&self, ctx: &SimContext, state: &mut IntegrationState, acceleration: f64);
}

/// Semi-implicit Euler along the racing line.
/// Velocity is updated first and clamped at zero (the car never reverses),
/// then distance is advanced with the new velocity.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemiImplicitEuler;

impl Integrator for SemiImplicitEuler {
    fn step(&self, ctx: &SimContext, state: &mut IntegrationState, acceleration: f64) {
        let dt = ctx.dt;
        state.velocity = (state.velocity + acceleration * dt).max(0.0);
        state.distance += state.velocity * dt;
        state.time += dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semi_implicit_euler() {
        let integrator = SemiImplicitEuler;
        let mut state = IntegrationState { time: 0.0, distance: 0.0, velocity: 10.0 };
        let ctx = SimContext { dt: 0.1, t: 0.0 };

        integrator.step(&ctx, &mut state, 2.0);

        // v = 10 + 2 * 0.1, distance uses the updated velocity
        assert!((state.velocity - 10.2).abs() < 1e-9);
        assert!((state.distance - 1.02).abs() < 1e-9);
        assert!((state.time - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_velocity_never_negative() {
        let integrator = SemiImplicitEuler;
        let mut state = IntegrationState { time: 0.0, distance: 5.0, velocity: 0.5 };
        let ctx = SimContext { dt: 0.05, t: 0.0 };

        integrator.step(&ctx, &mut state, -100.0);

        assert_eq!(state.velocity, 0.0);
        assert_eq!(state.distance, 5.0);
    }
}
