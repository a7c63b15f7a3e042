//! Shared vocabulary for the lap simulator: segment geometry, force and
//! load types, the vehicle and extension traits, integrators and errors.

pub mod error;
pub mod integrators;
mod traits;

pub use error::{SimError, SimResult};
pub use integrators::{Integrator, SemiImplicitEuler};
pub use traits::*;
