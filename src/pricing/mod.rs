//! Column pricing: randomized RCL route construction against reduced
//! costs, with cross-restart deduplication and pool filtering.

pub mod rollout;

use crate::config::{Config, ShiftRules};
use crate::instance::Instance;
use crate::neighborhoods::intra_neighborhoods;
use crate::search::{Acceptance, ImprovementChoice, LocalSearch, Objective};
use crate::shift::{jaccard_similarity, Shift};
use itertools::Itertools;
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Mutex;

pub use rollout::RolloutHeuristic;

/// Routes price out only below this margin; anything closer to zero is
/// noise the master problem cannot use.
pub(crate) const REDUCED_COST_TOLERANCE: f64 = -1e-6;

pub(crate) const FEASIBILITY_EPS: f64 = 1e-9;

/// Reduced-cost view of the travel matrix for one dual vector:
/// `rc[i][j] = d[i][j] − dual[j]` for non-depot `j`, self-loops are
/// infinite, and legs back to the depot keep their plain cost.
pub struct ReducedCosts {
    matrix: Vec<Vec<f64>>,
    shift_dual: f64,
}

impl ReducedCosts {
    /// `duals[0]` prices the shift-count constraint; `duals[j]` prices
    /// covering stop `j`. Missing trailing duals count as zero.
    pub fn new(travel_times: &[Vec<f64>], duals: &[f64]) -> Self {
        let n = travel_times.len();
        let mut matrix = vec![vec![0.0; n]; n];

        for i in 0..n {
            for j in 0..n {
                matrix[i][j] = if i == j {
                    f64::INFINITY
                } else if j == 0 {
                    travel_times[i][j]
                } else {
                    let dual = duals.get(j).copied().unwrap_or(0.0);
                    travel_times[i][j] - dual
                };
            }
        }

        ReducedCosts {
            matrix,
            shift_dual: duals.first().copied().unwrap_or(0.0),
        }
    }

    pub fn edge(&self, from: usize, to: usize) -> f64 {
        self.matrix[from][to]
    }

    /// Reduced cost of a closed route: the sum over its edges minus the
    /// shift-count dual.
    pub fn route_cost(&self, route: &[usize]) -> f64 {
        let edges: f64 = route
            .iter()
            .tuple_windows()
            .map(|(&a, &b)| self.matrix[a][b])
            .sum();
        edges - self.shift_dual
    }
}

/// Interface of the pricing subroutine as seen by the column-generation
/// loop: consume duals, emit candidate shifts with negative reduced cost.
/// An empty result is the normal "no improving columns" signal.
pub trait Pricer {
    fn price(&self, instance: &Instance, duals: &[f64]) -> Vec<Shift>;
}

/// Randomized restricted-candidate-list route construction.
///
/// Each restart grows one route from the depot, repeatedly picking
/// uniformly among the feasible next stops whose reduced cost lies within
/// `best + alpha · |best|`. Restarts are independent and run in parallel;
/// the only shared state is the seen-signature set.
pub struct PricingHeuristic {
    rules: ShiftRules,
    alpha: f64,
    restarts_per_start: usize,
    max_pool: usize,
    max_keep: usize,
    similarity_threshold: f64,
    seed: u64,
}

impl PricingHeuristic {
    pub fn new(config: &Config) -> Self {
        PricingHeuristic {
            rules: config.rules,
            alpha: config.rcl_alpha,
            restarts_per_start: config.restarts_per_start,
            max_pool: config.candidate_pool_size,
            max_keep: config.max_keep,
            similarity_threshold: config.similarity_threshold,
            seed: config.seed,
        }
    }

    /// Build the candidate pool for one dual vector.
    pub fn generate(&self, instance: &Instance, duals: &[f64]) -> Vec<Shift> {
        let n = instance.n_stops();
        if n <= 1 {
            return Vec::new();
        }

        let costs = ReducedCosts::new(instance.travel_times(), duals);

        let mut starts: Vec<usize> = (1..n).collect();
        starts.shuffle(&mut ChaCha8Rng::seed_from_u64(self.seed));

        let seen: Mutex<HashSet<u64>> = Mutex::new(HashSet::new());

        let pool: Vec<Shift> = starts
            .par_iter()
            .enumerate()
            .flat_map_iter(|(start_pos, &start)| {
                let mut local = Vec::new();

                for repeat in 0..self.restarts_per_start {
                    if seen.lock().unwrap().len() >= self.max_pool {
                        break;
                    }

                    let restart_index = (start_pos * self.restarts_per_start + repeat) as u64;
                    let mut rng = ChaCha8Rng::seed_from_u64(self.seed.wrapping_add(restart_index));

                    if let Some(shift) = self.build_route(instance, &costs, start, &mut rng) {
                        // Cap check and insert share one critical section
                        // so concurrent restarts cannot overshoot the pool.
                        let mut seen = seen.lock().unwrap();
                        if seen.len() < self.max_pool && seen.insert(shift.signature()) {
                            local.push(shift);
                        }
                    }
                }

                local
            })
            .collect();

        debug!("rcl pricing: raw pool of {} routes", pool.len());

        // Polish each candidate with a short intra-route local search
        // before pricing it; reordering stops can only lower the cost.
        let polished: Vec<Shift> = pool
            .into_par_iter()
            .map(|shift| self.polish(shift, instance))
            .collect();

        let mut candidates: Vec<(Shift, f64)> = polished
            .into_iter()
            .filter(|shift| shift.total_time >= self.rules.min_shift_duration)
            .map(|shift| {
                let cost = costs.route_cost(&shift.route);
                (shift, cost)
            })
            .filter(|(_, cost)| *cost < REDUCED_COST_TOLERANCE)
            .collect();

        candidates.sort_by(|a, b| a.1.total_cmp(&b.1));

        let kept = filter_pool(&candidates, self.max_keep, self.similarity_threshold);
        info!(
            "rcl pricing: {} candidates kept of {} priced",
            kept.len(),
            candidates.len()
        );
        kept
    }

    /// One restart: grow a route from `start`, close it, and keep it only
    /// if it lands inside the duration window.
    fn build_route(
        &self,
        instance: &Instance,
        costs: &ReducedCosts,
        start: usize,
        rng: &mut ChaCha8Rng,
    ) -> Option<Shift> {
        let n = instance.n_stops();
        let depot = 0usize;

        let mut visited = vec![false; n];
        visited[depot] = true;
        visited[start] = true;

        let mut route = vec![depot, start];
        let mut travel = instance.travel(depot, start);
        let mut service = instance.stop(start).service_time;
        let mut current = start;

        loop {
            let mut feasible = Vec::new();
            let mut best = f64::INFINITY;

            for j in 1..n {
                if visited[j] {
                    continue;
                }

                let new_travel = travel + instance.travel(current, j);
                let new_service = service + instance.stop(j).service_time;
                let total_with_return = new_travel
                    + instance.travel(j, depot)
                    + new_service
                    + self.rules.fixed_overhead;

                if total_with_return <= self.rules.max_shift_duration + FEASIBILITY_EPS {
                    let cost = costs.edge(current, j);
                    if cost < best {
                        best = cost;
                    }
                    feasible.push(j);
                }
            }

            if feasible.is_empty() {
                break;
            }

            let threshold = best + self.alpha * best.abs();
            let rcl: Vec<usize> = feasible
                .into_iter()
                .filter(|&j| costs.edge(current, j) <= threshold)
                .collect();

            if rcl.is_empty() {
                break;
            }

            let next = rcl[rng.gen_range(0..rcl.len())];
            travel += instance.travel(current, next);
            service += instance.stop(next).service_time;
            route.push(next);
            visited[next] = true;
            current = next;
        }

        route.push(depot);

        let shift = Shift::new(route, instance, self.rules.fixed_overhead);
        if shift.total_time < self.rules.min_shift_duration {
            return None;
        }
        Some(shift)
    }

    fn polish(&self, shift: Shift, instance: &Instance) -> Shift {
        let mut search = LocalSearch::new(
            intra_neighborhoods(),
            Acceptance::greedy(),
            ImprovementChoice::Best,
            Objective::total_length(),
            100,
            self.seed,
        );
        let mut improved = search.run(std::slice::from_ref(&shift), instance, &self.rules);
        improved.pop().unwrap_or(shift)
    }
}

impl Pricer for PricingHeuristic {
    fn price(&self, instance: &Instance, duals: &[f64]) -> Vec<Shift> {
        self.generate(instance, duals)
    }
}

/// Greedily keep candidates in ascending reduced-cost order, dropping any
/// whose stop set is too similar to an already kept one. Prevents
/// flooding the master problem with near-identical columns.
pub fn filter_pool(
    candidates: &[(Shift, f64)],
    max_keep: usize,
    similarity_threshold: f64,
) -> Vec<Shift> {
    let mut kept: Vec<Shift> = Vec::new();
    let mut kept_stops: Vec<Vec<usize>> = Vec::new();

    for (shift, cost) in candidates {
        if kept.len() >= max_keep {
            break;
        }

        let stops = shift.unique_stops();
        let too_similar = kept_stops
            .iter()
            .any(|other| jaccard_similarity(&stops, other) > similarity_threshold);

        if !too_similar {
            debug!(
                "keeping column: {} stops, total {:.1}, reduced cost {:.5}",
                shift.stop_count(),
                shift.total_time,
                cost
            );
            kept.push(shift.clone());
            kept_stops.push(stops);
        }
    }

    kept
}
