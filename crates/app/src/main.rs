use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use laptime::analysis::{segment_breakdown, summarize};
use laptime::batch::{BatchJob, run_batch};
use laptime::service::{self, SimulationRequest};
use laptime::{LapSimulator, SimulationConfig, validate_against_record};
use log::{LevelFilter, info};
use mechanics::{ThermalConstants, ThermalModel, Vehicle, VehicleParameters};
use serde::de::DeserializeOwned;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use track::{Circuit, Track, TrackDefinition};

mod report;

#[derive(Debug, Parser)]
#[command(name = "laptime", version, about = "Point-mass lap-time simulator", long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Simulate one lap
    Simulate {
        /// Built-in circuit id
        #[arg(short, long, default_value = "silverstone")]
        track: String,

        /// Track definition JSON file, used instead of --track
        #[arg(long)]
        track_file: Option<PathBuf>,

        /// Vehicle parameters JSON file (missing fields take defaults)
        #[arg(long)]
        vehicle: Option<PathBuf>,

        /// Simulation config JSON file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Track tire and brake temperatures
        #[arg(long)]
        thermal: bool,

        /// Print the per-segment breakdown
        #[arg(long)]
        segments: bool,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run one vehicle on every built-in circuit
    Compare {
        #[arg(long)]
        vehicle: Option<PathBuf>,

        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List the built-in circuits
    Tracks,

    /// Answer a simulation request document ("-" reads stdin)
    Request {
        path: PathBuf,

        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Command::Simulate { track, track_file, vehicle, config, thermal, segments, json } => {
            let track = match track_file {
                Some(path) => Track::from_definition(load_json::<TrackDefinition>(&path)?)?,
                None => Circuit::from_str(&track)?.build()?,
            };
            let vehicle = load_vehicle(vehicle.as_deref())?;
            simulate(&track, vehicle, load_config(config.as_deref())?, thermal, segments, json)
        }
        Command::Compare { vehicle, config } => {
            compare(load_vehicle(vehicle.as_deref())?, load_config(config.as_deref())?)
        }
        Command::Tracks => {
            report::print_tracks(&service::available_tracks()?);
            Ok(())
        }
        Command::Request { path, config } => {
            let request: SimulationRequest = if path.as_os_str() == "-" {
                let mut input = String::new();
                io::stdin().read_to_string(&mut input).context("reading request from stdin")?;
                serde_json::from_str(&input).context("parsing request")?
            } else {
                load_json(&path)?
            };
            let config = load_config(config.as_deref())?;
            match service::handle(&request, &config) {
                Ok(response) => {
                    println!("{}", serde_json::to_string_pretty(&response)?);
                    Ok(())
                }
                Err(err) => bail!("request failed ({}): {}", err.status_code(), err),
            }
        }
    }
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let config = ConfigBuilder::new().set_time_level(LevelFilter::Off).build();
    TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto)?;
    Ok(())
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn load_vehicle(path: Option<&Path>) -> Result<Vehicle> {
    let params = match path {
        Some(path) => load_json::<VehicleParameters>(path)?,
        None => VehicleParameters::default(),
    };
    Ok(Vehicle::new(params)?)
}

fn load_config(path: Option<&Path>) -> Result<SimulationConfig> {
    let config = match path {
        Some(path) => load_json::<SimulationConfig>(path)?,
        None => SimulationConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn simulate(
    track: &Track,
    vehicle: Vehicle,
    config: SimulationConfig,
    thermal: bool,
    segments: bool,
    json: bool,
) -> Result<()> {
    let mut simulator = LapSimulator::new(&vehicle, track, config)?;
    if thermal {
        simulator = simulator.with_extension(Box::new(ThermalModel::new(ThermalConstants::default())?));
    }
    let result = simulator.run();
    info!("{} telemetry samples", result.telemetry.len());

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let validation = track.record().map(|record| (record, validate_against_record(result.lap_time, record.time)));
    report::print_lap(track, &result, &summarize(&result), validation);
    if segments {
        report::print_segments(&segment_breakdown(track, &result.telemetry));
    }
    Ok(())
}

fn compare(vehicle: Vehicle, config: SimulationConfig) -> Result<()> {
    let tracks = Circuit::ALL.iter().map(|circuit| circuit.build()).collect::<Result<Vec<_>, _>>()?;
    let jobs: Vec<_> = tracks.iter().map(|track| BatchJob::new(track.name(), vehicle.clone(), track)).collect();

    let outcomes = run_batch(&jobs, &config);
    let mut rows = Vec::with_capacity(outcomes.len());
    for (track, outcome) in tracks.iter().zip(outcomes) {
        let result = outcome.result.with_context(|| format!("simulating {}", outcome.label))?;
        let validation = track.record().map(|record| validate_against_record(result.lap_time, record.time));
        rows.push((outcome.label, result, validation));
    }
    report::print_comparison(&rows);
    Ok(())
}
