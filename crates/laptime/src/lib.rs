//! Lap-time simulation of a point-mass race car.
//!
//! [`LapSimulator`] integrates a [`simcore::VehicleModel`] around a
//! [`track::Track`] and returns a [`LapResult`] with telemetry. The
//! remaining modules work on finished laps: comparison with a reference
//! time, per-segment analysis, batches on worker threads and the service
//! contract used by front ends.

pub mod analysis;
pub mod batch;
pub mod config;
pub mod service;
pub mod simulator;
pub mod telemetry;
pub mod validation;

pub use config::SimulationConfig;
pub use simulator::{LapResult, LapSimulator, simulate_lap};
pub use telemetry::{Telemetry, TelemetrySample};
pub use validation::{AccuracyRating, ValidationReport, validate_against_record};
