//! Request/response contract for serving simulations to a front end.
//!
//! A request names a circuit and a handful of setup knobs expressed the way
//! a user thinks about them (horsepower, percentages). The response carries
//! the lap time, the record comparison, a per-segment breakdown and a
//! telemetry series small enough to plot. Speeds in responses are km/h.

use std::str::FromStr;

use log::{debug, error};
use mechanics::{KMH_PER_MS, Vehicle, VehicleParameters};
use serde::{Deserialize, Serialize};
use simcore::{SegmentType, SimError, SimResult};
use thiserror::Error;
use track::{Circuit, Track};

use crate::analysis::segment_breakdown;
use crate::config::SimulationConfig;
use crate::simulator::simulate_lap;
use crate::validation::{AccuracyRating, validate_against_record};

pub const WATTS_PER_HP: f64 = 746.0;

/// Upper bound on points in [`SimulationResponse::telemetry`].
pub const MAX_TELEMETRY_POINTS: usize = 200;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    /// The request itself is at fault (unknown circuit, impossible setup).
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::Internal(_) => 500,
        }
    }
}

impl From<SimError> for ServiceError {
    fn from(err: SimError) -> Self {
        match err {
            SimError::UnknownTrack(_) | SimError::InvalidParameter { .. } | SimError::UnsupportedVersion { .. } => {
                ServiceError::BadRequest(err.to_string())
            }
            _ => ServiceError::Internal(err.to_string()),
        }
    }
}

/// User-facing setup, relative to the baseline car.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleSetup {
    /// hp
    pub power: f64,
    /// % of baseline downforce.
    pub downforce: f64,
    /// % of baseline tire grip.
    pub tire: f64,
    /// kg, without fuel.
    pub mass: f64,
    /// % of baseline drag.
    pub drag: f64,
}

impl Default for VehicleSetup {
    fn default() -> Self {
        VehicleSetup { power: 1000.0, downforce: 100.0, tire: 100.0, mass: 798.0, drag: 100.0 }
    }
}

impl VehicleSetup {
    /// `base` with this setup applied. DRS coefficients scale with their
    /// normal counterparts.
    pub fn apply(&self, base: &VehicleParameters) -> SimResult<VehicleParameters> {
        let mut params = base
            .clone()
            .with_max_power(self.power * WATTS_PER_HP)
            .with_mass_empty(self.mass)
            .with_downforce_scale(self.downforce / 100.0)
            .with_drag_scale(self.drag / 100.0);
        params.tire_mu_peak *= self.tire / 100.0;
        params.validate()?;
        Ok(params)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub track: String,
    #[serde(default)]
    pub vehicle_params: VehicleSetup,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordComparison {
    pub time: f64,
    pub holder: String,
    pub year: u16,
    pub difference: f64,
    pub error_percent: f64,
    pub rating: AccuracyRating,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentResult {
    pub name: String,
    pub segment_type: SegmentType,
    pub length: f64,
    pub sim_time: f64,
    pub avg_speed: f64,
    pub max_speed: f64,
    pub min_speed: f64,
}

/// Column-wise telemetry for plotting.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TelemetrySeries {
    pub time: Vec<f64>,
    pub distance: Vec<f64>,
    pub speed: Vec<f64>,
    pub drs_active: Vec<bool>,
}

impl TelemetrySeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResponse {
    pub track_id: String,
    pub track_name: String,
    /// Simulated length (m).
    pub track_length: f64,
    pub sim_time: f64,
    pub converged: bool,
    pub record: Option<RecordComparison>,
    pub max_speed: f64,
    pub avg_speed: f64,
    pub segments: Vec<SegmentResult>,
    pub telemetry: TelemetrySeries,
}

/// Runs the lap a request describes.
pub fn handle(request: &SimulationRequest, config: &SimulationConfig) -> Result<SimulationResponse, ServiceError> {
    let circuit = Circuit::from_str(&request.track)?;
    let params = request.vehicle_params.apply(&VehicleParameters::default())?;
    let vehicle = Vehicle::new(params)?;
    let track = circuit.build().map_err(internal)?;

    debug!("service request: {} with {:?}", circuit, request.vehicle_params);
    let result = simulate_lap(&vehicle, &track, config).map_err(internal)?;
    let telemetry = &result.telemetry;

    let record = track.record().map(|record| {
        let report = validate_against_record(result.lap_time, record.time);
        RecordComparison {
            time: record.time,
            holder: record.holder.clone(),
            year: record.year,
            difference: report.difference,
            error_percent: report.error_percent,
            rating: report.rating,
        }
    });

    let segments = segment_breakdown(&track, telemetry)
        .into_iter()
        .map(|segment| SegmentResult {
            name: segment.name,
            segment_type: segment.segment_type,
            length: segment.length,
            sim_time: segment.time,
            avg_speed: segment.avg_speed * KMH_PER_MS,
            max_speed: segment.max_speed * KMH_PER_MS,
            min_speed: segment.min_speed * KMH_PER_MS,
        })
        .collect();

    let mut series = TelemetrySeries::default();
    for sample in telemetry.downsample(MAX_TELEMETRY_POINTS) {
        series.time.push(sample.time);
        series.distance.push(sample.distance);
        series.speed.push(sample.speed_kmh());
        series.drs_active.push(sample.drs_active);
    }

    Ok(SimulationResponse {
        track_id: circuit.id().to_string(),
        track_name: track.name().to_string(),
        track_length: track.total_length(),
        sim_time: result.lap_time,
        converged: result.converged,
        record,
        max_speed: telemetry.max_speed().unwrap_or_default() * KMH_PER_MS,
        avg_speed: telemetry.mean_speed().unwrap_or_default() * KMH_PER_MS,
        segments,
        telemetry: series,
    })
}

fn internal(err: SimError) -> ServiceError {
    error!("simulation failed: {}", err);
    ServiceError::Internal(err.to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackInfo {
    pub id: String,
    pub name: String,
    pub country: String,
    pub character: String,
    /// Real circuit length (m), when known.
    pub length: Option<f64>,
    pub simulated_length: f64,
    pub record_time: Option<f64>,
    pub record_holder: Option<String>,
    pub year: Option<u16>,
}

impl TrackInfo {
    fn new(circuit: Circuit, track: &Track) -> Self {
        TrackInfo {
            id: circuit.id().to_string(),
            name: track.name().to_string(),
            country: circuit.country().to_string(),
            character: circuit.character().to_string(),
            length: circuit.official_length(),
            simulated_length: track.total_length(),
            record_time: track.record().map(|r| r.time),
            record_holder: track.record().map(|r| r.holder.clone()),
            year: track.record().map(|r| r.year),
        }
    }
}

/// Every built-in circuit a request may name.
pub fn available_tracks() -> Result<Vec<TrackInfo>, ServiceError> {
    Circuit::ALL
        .into_iter()
        .map(|circuit| circuit.build().map(|track| TrackInfo::new(circuit, &track)).map_err(internal))
        .collect()
}
