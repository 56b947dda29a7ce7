//! Basic example: build a shift plan for a synthetic ring of stops.

use shift_opt::config::Config;
use shift_opt::instance::{Instance, Stop};
use shift_opt::report::{check_feasibility, ShiftStatistics};
use shift_opt::ShiftPlanner;
use std::env;
use std::time::Duration;

/// Stops on a ring around the depot, every fourth one night-only.
fn ring_instance(n: usize) -> Result<Instance, shift_opt::DataError> {
    let mut stops = vec![Stop::new(0, false, 0.0, 0.0, 0.0)];
    for i in 1..n {
        let angle = 2.0 * std::f64::consts::PI * i as f64 / (n - 1) as f64;
        stops.push(Stop::new(
            i,
            i % 4 == 0,
            5.0,
            angle.cos() * 20.0,
            angle.sin() * 20.0,
        ));
    }

    let travel = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| {
                    let dx = stops[i].latitude - stops[j].latitude;
                    let dy = stops[i].longitude - stops[j].longitude;
                    (dx * dx + dy * dy).sqrt()
                })
                .collect()
        })
        .collect();

    Instance::new(stops, travel)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let n = if args.len() > 1 { args[1].parse()? } else { 60 };

    println!("Building instance with {} stops", n);
    let instance = ring_instance(n)?;

    let config = Config::new()
        .with_max_iterations(5_000)
        .with_time_limit(Duration::from_secs(30))
        .with_seed(10);

    let mut planner = ShiftPlanner::new(instance, config);
    let shifts = planner.run().to_vec();

    println!("Planned {} shifts in {:.2?}", shifts.len(), planner.run_time);
    for (i, shift) in shifts.iter().enumerate() {
        println!(
            "  shift {:>2}: {:>2} stops, {:>5.1} min, {}",
            i,
            shift.stop_count(),
            shift.total_time,
            if shift.night_shift { "night" } else { "day" }
        );
    }

    let stats = ShiftStatistics::compute(&shifts);
    println!(
        "Day: {} shifts / mean {:.1} min, night: {} shifts / mean {:.1} min",
        stats.day.count, stats.day.mean_time, stats.night.count, stats.night.mean_time
    );

    let report = check_feasibility(&shifts, &planner.instance, &planner.config.rules);
    println!(
        "Feasible: {} ({} night shifts)",
        report.is_feasible(),
        report.night_shift_count
    );

    Ok(())
}
