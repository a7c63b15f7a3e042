//! Independent laps on worker threads.

use std::num::NonZeroUsize;
use std::thread;

use log::debug;
use mechanics::Vehicle;
use simcore::SimResult;
use track::Track;

use crate::config::SimulationConfig;
use crate::simulator::{LapResult, simulate_lap};

/// One vehicle on one track.
#[derive(Debug, Clone)]
pub struct BatchJob<'a> {
    pub label: String,
    pub vehicle: Vehicle,
    pub track: &'a Track,
}

impl<'a> BatchJob<'a> {
    pub fn new(label: impl Into<String>, vehicle: Vehicle, track: &'a Track) -> Self {
        BatchJob { label: label.into(), vehicle, track }
    }
}

#[derive(Debug)]
pub struct BatchOutcome {
    pub label: String,
    pub result: SimResult<LapResult>,
}

/// Runs every job with `config`, spreading them over at most one thread per
/// available core. Outcomes come back in job order.
pub fn run_batch(jobs: &[BatchJob<'_>], config: &SimulationConfig) -> Vec<BatchOutcome> {
    if jobs.is_empty() {
        return Vec::new();
    }

    let workers = thread::available_parallelism().map(NonZeroUsize::get).unwrap_or(1).min(jobs.len());
    let chunk_size = jobs.len().div_ceil(workers);
    debug!("running {} laps on {} threads", jobs.len(), workers);

    thread::scope(|s| {
        let handles: Vec<_> = jobs
            .chunks(chunk_size)
            .map(|chunk| {
                s.spawn(move || {
                    chunk
                        .iter()
                        .map(|job| BatchOutcome {
                            label: job.label.clone(),
                            result: simulate_lap(&job.vehicle, job.track, config),
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mechanics::VehicleParameters;

    fn track() -> Track {
        Track::builder("Batch").straight("Main", 600.0).corner("Turn", 100.0, 50.0).build().unwrap()
    }

    #[test]
    fn test_empty_batch() {
        assert!(run_batch(&[], &SimulationConfig::default()).is_empty());
    }

    #[test]
    fn test_results_in_job_order_and_match_serial_runs() {
        let track = track();
        let config = SimulationConfig::default();
        let jobs: Vec<_> = (0..6)
            .map(|i| {
                let power = 400_000.0 + 100_000.0 * i as f64;
                let vehicle = Vehicle::new(VehicleParameters::default().with_max_power(power)).unwrap();
                BatchJob::new(format!("{} kW", power / 1000.0), vehicle, &track)
            })
            .collect();

        let outcomes = run_batch(&jobs, &config);
        assert_eq!(outcomes.len(), jobs.len());
        for (job, outcome) in jobs.iter().zip(&outcomes) {
            assert_eq!(job.label, outcome.label);
            let serial = simulate_lap(&job.vehicle, &track, &config).unwrap();
            assert_eq!(outcome.result.as_ref().unwrap(), &serial);
        }
    }

    #[test]
    fn test_invalid_config_reported_per_job() {
        let track = track();
        let jobs = vec![BatchJob::new("a", Vehicle::default(), &track), BatchJob::new("b", Vehicle::default(), &track)];
        let outcomes = run_batch(&jobs, &SimulationConfig::default().with_sample_stride(0));
        assert!(outcomes.iter().all(|o| o.result.is_err()));
    }
}
