//! Plain-text output.

use laptime::analysis::{LapSummary, SegmentBreakdown};
use laptime::service::TrackInfo;
use laptime::{AccuracyRating, LapResult, ValidationReport};
use mechanics::KMH_PER_MS;
use track::{LapRecord, Track};

fn rating_label(rating: AccuracyRating) -> &'static str {
    match rating {
        AccuracyRating::Excellent => "excellent (within 5 %)",
        AccuracyRating::Good => "good (within 10 %)",
        AccuracyRating::NeedsWork => "needs work (over 10 %)",
    }
}

pub fn print_lap(
    track: &Track,
    result: &LapResult,
    summary: &LapSummary,
    validation: Option<(&LapRecord, ValidationReport)>,
) {
    println!("{} ({:.0} m, {} segments)", track.name(), track.total_length(), track.segments().len());
    if result.converged {
        println!("  lap time      {:>9.3} s", result.lap_time);
    } else {
        println!(
            "  DID NOT FINISH after {} steps ({:.0} of {:.0} m)",
            result.iterations,
            result.distance,
            track.total_length()
        );
    }
    println!("  top speed     {:>9.1} km/h", summary.max_speed * KMH_PER_MS);
    println!("  min speed     {:>9.1} km/h", summary.min_speed * KMH_PER_MS);
    println!("  mean speed    {:>9.1} km/h", summary.mean_speed * KMH_PER_MS);
    println!("  full throttle {:>9.1} %", summary.accelerating_fraction * 100.0);
    println!("  braking       {:>9.1} %", summary.braking_fraction * 100.0);
    println!("  DRS open      {:>9.1} %", summary.drs_fraction * 100.0);
    println!("  peak lateral  {:>9.2} g", summary.peak_lateral_g);
    println!("  peak braking  {:>9.2} g", summary.peak_braking_g);

    if let Some((record, report)) = validation {
        println!();
        println!("  record        {:>9.3} s  {} ({})", record.time, record.holder, record.year);
        println!("  difference    {:>+9.3} s  ({:+.2} %)", report.difference, report.error_percent);
        println!("  accuracy      {}", rating_label(report.rating));
    }
}

pub fn print_segments(segments: &[SegmentBreakdown]) {
    println!();
    println!("  {:<22} {:<14} {:>7} {:>8} {:>8} {:>8} {:>8}", "segment", "type", "length", "time", "min", "avg", "max");
    for segment in segments {
        println!(
            "  {:<22} {:<14} {:>7.0} {:>8.2} {:>8.1} {:>8.1} {:>8.1}",
            segment.name,
            segment.segment_type.as_str(),
            segment.length,
            segment.time,
            segment.min_speed * KMH_PER_MS,
            segment.avg_speed * KMH_PER_MS,
            segment.max_speed * KMH_PER_MS,
        );
    }
}

pub fn print_tracks(tracks: &[TrackInfo]) {
    for info in tracks {
        let length = info.length.map_or_else(|| "-".to_string(), |l| format!("{:.0} m", l));
        print!(
            "{:<12} {:<20} {:<16} {:>8}  ({:.0} m simulated)",
            info.id, info.name, info.country, length, info.simulated_length
        );
        match (info.record_time, info.record_holder.as_deref(), info.year) {
            (Some(time), Some(holder), Some(year)) => println!("  record {:.3} s, {} {}", time, holder, year),
            _ => println!(),
        }
    }
}

pub fn print_comparison(rows: &[(String, LapResult, Option<ValidationReport>)]) {
    println!("{:<20} {:>10} {:>10} {:>10}", "track", "lap (s)", "record", "error");
    for (label, result, validation) in rows {
        let finished = if result.converged { format!("{:.3}", result.lap_time) } else { "DNF".to_string() };
        match validation {
            Some(report) => println!(
                "{:<20} {:>10} {:>10.3} {:>+9.2}%",
                label, finished, report.reference, report.error_percent
            ),
            None => println!("{:<20} {:>10} {:>10} {:>10}", label, finished, "-", "-"),
        }
    }
}
