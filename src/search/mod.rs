//! Local-search orchestrator.

pub mod acceptance;
pub mod objective;

use crate::config::ShiftRules;
use crate::instance::Instance;
use crate::neighborhoods::{Move, Neighborhood, SearchContext};
use crate::shift::{recompute_all, Shift};
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::{Duration, Instant};

pub use acceptance::Acceptance;
pub use objective::{Objective, ShiftChange, SolutionStats};

/// Whether a neighborhood scan applies the first accepted move or keeps
/// scanning for the best one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImprovementChoice {
    /// Apply the first accepted feasible move; cheaper per iteration.
    First,
    /// Scan the whole move list and apply the single best accepted move.
    Best,
}

/// Drives the neighborhoods to a local optimum (or budget exhaustion)
/// under an acceptance rule and an objective.
///
/// The orchestrator is strictly single-threaded: move evaluation reads
/// global running statistics and the annealing acceptance draws form one
/// strict PRNG sequence.
pub struct LocalSearch {
    neighborhoods: Vec<Box<dyn Neighborhood>>,
    acceptance: Acceptance,
    choice: ImprovementChoice,
    objective: Objective,
    max_iterations: u32,
    time_limit: Option<Duration>,
    shuffle_rng: ChaCha8Rng,
    /// Iterations performed by the most recent `run`.
    pub iterations: u32,
}

impl LocalSearch {
    pub fn new(
        neighborhoods: Vec<Box<dyn Neighborhood>>,
        acceptance: Acceptance,
        choice: ImprovementChoice,
        objective: Objective,
        max_iterations: u32,
        seed: u64,
    ) -> Self {
        LocalSearch {
            neighborhoods,
            acceptance,
            choice,
            objective,
            max_iterations,
            time_limit: None,
            shuffle_rng: ChaCha8Rng::seed_from_u64(seed),
            iterations: 0,
        }
    }

    /// Bound the search by wall-clock time in addition to the iteration
    /// cap. Checked at iteration boundaries only.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Improve `initial` until no neighborhood yields an accepted move or
    /// a budget runs out. The input is never mutated; the working shift
    /// list is owned exclusively by the run.
    pub fn run(&mut self, initial: &[Shift], instance: &Instance, rules: &ShiftRules) -> Vec<Shift> {
        let mut shifts = initial.to_vec();
        recompute_all(&mut shifts, instance, rules.fixed_overhead);

        let start = Instant::now();
        let mut order: Vec<usize> = (0..self.neighborhoods.len()).collect();

        self.iterations = 0;
        let mut improved = true;

        while improved && self.iterations < self.max_iterations {
            if let Some(limit) = self.time_limit {
                if start.elapsed() >= limit {
                    info!("local search stopped: time limit after {} iterations", self.iterations);
                    break;
                }
            }

            self.iterations += 1;
            improved = false;

            if self.acceptance.shuffles_neighborhoods() {
                order.shuffle(&mut self.shuffle_rng);
            }

            for &n_idx in &order {
                let neighborhood = &self.neighborhoods[n_idx];
                let ctx = SearchContext::new(instance, rules, &self.objective, &shifts);
                let moves = neighborhood.generate_moves(&shifts, &ctx);

                let mut best_accepted: Option<(Move, f64)> = None;

                for mv in moves {
                    let eval = neighborhood.evaluate_move(&mv, &shifts, &ctx);
                    if !eval.feasible {
                        continue;
                    }
                    if !self.acceptance.accept(eval.delta) {
                        continue;
                    }

                    match self.choice {
                        ImprovementChoice::First => {
                            debug!(
                                "iteration {}: {} applies delta {:.4}",
                                self.iterations,
                                neighborhood.name(),
                                eval.delta
                            );
                            neighborhood.apply_move(&mv, &mut shifts, &ctx);
                            recompute_all(&mut shifts, instance, rules.fixed_overhead);
                            improved = true;
                            break;
                        }
                        ImprovementChoice::Best => {
                            if best_accepted.map_or(true, |(_, best)| eval.delta > best) {
                                best_accepted = Some((mv, eval.delta));
                            }
                        }
                    }
                }

                if self.choice == ImprovementChoice::Best {
                    if let Some((mv, delta)) = best_accepted {
                        debug!(
                            "iteration {}: {} applies best delta {:.4}",
                            self.iterations,
                            neighborhood.name(),
                            delta
                        );
                        neighborhood.apply_move(&mv, &mut shifts, &ctx);
                        recompute_all(&mut shifts, instance, rules.fixed_overhead);
                        improved = true;
                    }
                }

                // one applied neighborhood per iteration
                if improved {
                    break;
                }
            }

            self.acceptance.cool_down();
            if let Some(temperature) = self.acceptance.temperature() {
                debug!(
                    "temperature after iteration {}: {:.6}",
                    self.iterations, temperature
                );
            }
        }

        info!(
            "local search done after {} iterations, objective {:.2}",
            self.iterations,
            self.objective.evaluate(&shifts)
        );

        shifts
    }
}
