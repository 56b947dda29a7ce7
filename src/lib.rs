//! # shift-opt
//!
//! A shift-scheduling optimization engine for cleaning crews visiting
//! fixed stops (e.g. tram stops) from a central depot.
//!
//! Shifts are split into day and night pools with a cap on the number of
//! night shifts. The engine combines a greedy constructive heuristic, a
//! neighborhood-based local search with simulated-annealing acceptance,
//! and a randomized restricted-candidate-list pricing heuristic that
//! proposes new shift columns to an external master problem.

pub mod config;
pub mod constructor;
pub mod instance;
pub mod master;
pub mod neighborhoods;
pub mod pricing;
pub mod report;
pub mod search;
pub mod shift;

pub use crate::config::{Config, ShiftRules};
pub use crate::instance::{DataError, Instance, Stop};
pub use crate::master::{ColumnGeneration, ColumnGenerationReport, MasterError, MasterProblem};
pub use crate::pricing::{Pricer, PricingHeuristic, ReducedCosts, RolloutHeuristic};
pub use crate::report::{check_feasibility, FeasibilityReport, ShiftStatistics};
pub use crate::search::{Acceptance, ImprovementChoice, LocalSearch, Objective};
pub use crate::shift::Shift;

use crate::constructor::build_greedy_shifts;
use crate::neighborhoods::standard_neighborhoods;
use crate::shift::count_night_shifts;
use log::info;
use std::time::{Duration, Instant};

/// End-to-end heuristic pipeline: greedy construction for the day and
/// night pools, a balancing local-search pass, then a simulated-annealing
/// pass on total length.
pub struct ShiftPlanner {
    pub instance: Instance,
    pub config: Config,
    pub best_shifts: Vec<Shift>,
    pub run_time: Duration,
}

impl ShiftPlanner {
    pub fn new(instance: Instance, config: Config) -> Self {
        ShiftPlanner {
            instance,
            config,
            best_shifts: Vec::new(),
            run_time: Duration::from_secs(0),
        }
    }

    /// Build the initial plan: one greedy pass over the night-only stops,
    /// one over the day stops.
    pub fn construct(&self) -> Vec<Shift> {
        let night_stops = self.instance.allowed_indices(true);
        let day_stops = self.instance.allowed_indices(false);

        let mut shifts = build_greedy_shifts(
            &self.instance,
            &night_stops,
            &self.config.rules,
            self.config.construction_shift_length,
        );
        shifts.extend(build_greedy_shifts(
            &self.instance,
            &day_stops,
            &self.config.rules,
            self.config.construction_shift_length,
        ));
        shifts
    }

    /// Run the full pipeline and return the best plan found.
    pub fn run(&mut self) -> &[Shift] {
        let start = Instant::now();

        let initial = self.construct();
        info!(
            "constructed {} shifts ({} night)",
            initial.len(),
            count_night_shifts(&initial)
        );

        // Balancing pass: greedy descent on the balanced objective evens
        // out shift durations and workloads before the annealing pass.
        let mut balancer = LocalSearch::new(
            standard_neighborhoods(),
            Acceptance::greedy(),
            ImprovementChoice::Best,
            Objective::balanced(1.0, 1.0),
            self.config.max_iterations,
            self.config.seed,
        );
        let balanced = balancer.run(&initial, &self.instance, &self.config.rules);

        // Annealing pass on plain total length, using the remaining time
        // budget if one was configured.
        let mut annealer = LocalSearch::new(
            standard_neighborhoods(),
            Acceptance::simulated_annealing(
                self.config.initial_temperature,
                self.config.cooling_rate,
                self.config.seed,
            ),
            ImprovementChoice::First,
            Objective::total_length(),
            self.config.max_iterations,
            self.config.seed,
        );
        if let Some(limit) = self.config.time_limit {
            let remaining = limit.saturating_sub(start.elapsed());
            annealer = annealer.with_time_limit(remaining);
        }
        self.best_shifts = annealer.run(&balanced, &self.instance, &self.config.rules);

        self.run_time = start.elapsed();
        let objective = Objective::total_length().evaluate(&self.best_shifts);
        info!(
            "finished in {:.2?}: {} shifts, total time {:.1}",
            self.run_time,
            self.best_shifts.len(),
            objective
        );
        self.best_shifts.as_slice()
    }
}
