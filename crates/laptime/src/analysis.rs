//! Post-lap summaries built from telemetry.

use serde::Serialize;
use simcore::{ControlMode, SegmentType};
use track::Track;

use crate::simulator::LapResult;
use crate::telemetry::{Telemetry, TelemetrySample};

/// Per-segment figures. Speeds in m/s.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentBreakdown {
    pub index: usize,
    pub name: String,
    pub segment_type: SegmentType,
    pub length: f64,
    /// Time between the first and last sample inside the segment (s).
    pub time: f64,
    pub min_speed: f64,
    pub avg_speed: f64,
    pub max_speed: f64,
    pub samples: usize,
}

/// Breakdown of every segment that holds at least one sample whose distance
/// falls in the segment's `[start, end)`.
pub fn segment_breakdown(track: &Track, telemetry: &Telemetry) -> Vec<SegmentBreakdown> {
    track
        .segments()
        .iter()
        .enumerate()
        .filter_map(|(index, segment)| {
            let samples: Vec<_> = telemetry.within(segment.start, segment.end).collect();
            let first = samples.first()?;
            let last = samples.last()?;
            let speeds = samples.iter().map(|s| s.speed);

            Some(SegmentBreakdown {
                index,
                name: segment.name.clone(),
                segment_type: segment.segment_type,
                length: segment.length,
                time: last.time - first.time,
                min_speed: speeds.clone().fold(f64::INFINITY, f64::min),
                avg_speed: speeds.clone().sum::<f64>() / samples.len() as f64,
                max_speed: speeds.fold(f64::NEG_INFINITY, f64::max),
                samples: samples.len(),
            })
        })
        .collect()
}

/// Share of samples spent in each control mode and with DRS open.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LapSummary {
    pub lap_time: f64,
    /// m/s
    pub max_speed: f64,
    pub min_speed: f64,
    pub mean_speed: f64,
    pub accelerating_fraction: f64,
    pub braking_fraction: f64,
    pub coasting_fraction: f64,
    pub drs_fraction: f64,
    pub peak_lateral_g: f64,
    pub peak_braking_g: f64,
}

fn fraction(telemetry: &Telemetry, predicate: impl Fn(&TelemetrySample) -> bool) -> f64 {
    telemetry.iter().filter(|s| predicate(s)).count() as f64 / telemetry.len() as f64
}

pub fn summarize(result: &LapResult) -> LapSummary {
    let telemetry = &result.telemetry;
    if telemetry.is_empty() {
        return LapSummary { lap_time: result.lap_time, ..Default::default() };
    }

    LapSummary {
        lap_time: result.lap_time,
        max_speed: telemetry.max_speed().unwrap_or_default(),
        min_speed: telemetry.min_speed().unwrap_or_default(),
        mean_speed: telemetry.mean_speed().unwrap_or_default(),
        accelerating_fraction: fraction(telemetry, |s| s.mode == ControlMode::Accelerating),
        braking_fraction: fraction(telemetry, |s| s.mode == ControlMode::Braking),
        coasting_fraction: fraction(telemetry, |s| s.mode == ControlMode::Coasting),
        drs_fraction: fraction(telemetry, |s| s.drs_active),
        peak_lateral_g: telemetry.iter().map(|s| s.lateral_g).fold(0.0, f64::max),
        peak_braking_g: telemetry.iter().map(|s| -s.longitudinal_g).fold(0.0, f64::max),
    }
}
