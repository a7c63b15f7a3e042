//! Force models for a point-mass race car.
//!
//! [`Vehicle`] implements [`simcore::VehicleModel`] on top of the aero,
//! load-transfer, powertrain and tire sub-models. [`ThermalModel`] is an
//! optional [`simcore::VehicleExtension`] for tire and brake temperature.

pub mod aero;
pub mod load;
pub mod powertrain;
pub mod thermal;
pub mod tire;
pub mod vehicle;

pub use thermal::{ThermalConstants, ThermalModel};
pub use tire::{PacejkaConstants, TireForce, TireModel};
pub use vehicle::{KMH_PER_MS, PARAMETERS_VERSION, Vehicle, VehicleParameters};
