//! Rollout pricing: a lookahead variant of the RCL constructor that
//! scores each candidate extension by greedily completing the route.

use crate::config::{Config, ShiftRules};
use crate::instance::Instance;
use crate::pricing::{filter_pool, Pricer, ReducedCosts, FEASIBILITY_EPS, REDUCED_COST_TOLERANCE};
use crate::shift::{route_duration, Shift};
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Mutex;

/// Myopic step score used to shortlist extensions before rolling them
/// out: travel to the stop plus its service time minus its dual.
fn step_score(instance: &Instance, duals: &[f64], from: usize, to: usize) -> f64 {
    let dual = duals.get(to).copied().unwrap_or(0.0);
    instance.travel(from, to) + instance.stop(to).service_time - dual
}

/// Lookahead pricing. Where [`super::PricingHeuristic`] builds its RCL
/// from immediate edge costs, this one shortlists the best few
/// extensions by step score, simulates a greedy completion for each,
/// and draws from an RCL over the completed routes' reduced costs.
/// Slower per route, but each run weighs the consequences of a choice
/// instead of only its immediate cost.
pub struct RolloutHeuristic {
    rules: ShiftRules,
    runs: usize,
    top_k: usize,
    alpha: f64,
    max_keep: usize,
    similarity_threshold: f64,
    seed: u64,
}

impl RolloutHeuristic {
    pub fn new(config: &Config) -> Self {
        RolloutHeuristic {
            rules: config.rules,
            runs: config.rollout_runs,
            top_k: config.rollout_candidate_pool,
            alpha: config.rcl_alpha,
            max_keep: config.max_keep,
            similarity_threshold: config.similarity_threshold,
            seed: config.seed,
        }
    }

    pub fn generate(&self, instance: &Instance, duals: &[f64]) -> Vec<Shift> {
        let n = instance.n_stops();
        if n <= 1 {
            return Vec::new();
        }

        let costs = ReducedCosts::new(instance.travel_times(), duals);

        let mut starts: Vec<usize> = (1..n).collect();
        starts.shuffle(&mut ChaCha8Rng::seed_from_u64(self.seed));
        starts.truncate(self.runs);

        let seen: Mutex<HashSet<u64>> = Mutex::new(HashSet::new());

        let pool: Vec<Shift> = starts
            .par_iter()
            .enumerate()
            .filter_map(|(run, &start)| {
                let mut rng = ChaCha8Rng::seed_from_u64(self.seed.wrapping_add(run as u64));
                let shift = self.rollout_route(instance, &costs, duals, start, &mut rng)?;
                if seen.lock().unwrap().insert(shift.signature()) {
                    Some(shift)
                } else {
                    None
                }
            })
            .collect();

        debug!("rollout pricing: raw pool of {} routes", pool.len());

        let mut candidates: Vec<(Shift, f64)> = pool
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
            "rollout pricing: {} candidates kept of {} priced",
            kept.len(),
            candidates.len()
        );
        kept
    }

    /// Build one route from `start`, choosing each extension by rollout.
    /// Closing the route early is itself a candidate once the partial
    /// route is long enough and already prices out negative.
    fn rollout_route(
        &self,
        instance: &Instance,
        costs: &ReducedCosts,
        duals: &[f64],
        start: usize,
        rng: &mut ChaCha8Rng,
    ) -> Option<Shift> {
        let n = instance.n_stops();
        let depot = 0usize;

        let mut visited = vec![false; n];
        visited[depot] = true;
        visited[start] = true;

        let mut route = vec![depot, start];
        let mut current = start;

        loop {
            let mut shortlist: Vec<(usize, f64)> = (1..n)
                .filter(|&j| !visited[j])
                .filter(|&j| self.extension_fits(instance, &route, j))
                .map(|j| (j, step_score(instance, duals, current, j)))
                .collect();
            shortlist.sort_by(|a, b| a.1.total_cmp(&b.1));
            shortlist.truncate(self.top_k);

            if shortlist.is_empty() {
                break;
            }

            let mut closed = route.clone();
            closed.push(depot);
            let close_cost = if self.within_bounds(instance, &closed) {
                costs.route_cost(&closed)
            } else {
                f64::INFINITY
            };
            if close_cost < 0.0 {
                break;
            }

            let completions: Vec<(usize, f64)> = shortlist
                .iter()
                .map(|&(j, _)| {
                    let completed =
                        self.greedy_completion(instance, duals, &route, &visited, j);
                    (j, costs.route_cost(&completed))
                })
                .collect();

            let best = completions
                .iter()
                .map(|&(_, cost)| cost)
                .fold(f64::INFINITY, f64::min);

            // RCL over the completed routes' reduced costs, not the
            // immediate edge costs.
            let threshold = best + self.alpha * best.abs();
            let rcl: Vec<(usize, f64)> = completions
                .into_iter()
                .filter(|&(_, cost)| cost <= threshold)
                .collect();
            if rcl.is_empty() {
                break;
            }

            let (next, cost) = rcl[rng.gen_range(0..rcl.len())];
            if cost >= close_cost {
                break;
            }
            route.push(next);
            visited[next] = true;
            current = next;
        }

        route.push(depot);
        if !self.within_bounds(instance, &route) {
            return None;
        }
        Some(Shift::new(route, instance, self.rules.fixed_overhead))
    }

    /// Extend the partial route greedily by step score until nothing
    /// more fits, then close it. Pure simulation, no state is shared
    /// with the caller's route.
    fn greedy_completion(
        &self,
        instance: &Instance,
        duals: &[f64],
        route: &[usize],
        visited: &[bool],
        first: usize,
    ) -> Vec<usize> {
        let n = instance.n_stops();
        let depot = 0usize;

        let mut sim_route = route.to_vec();
        let mut sim_visited = visited.to_vec();
        sim_route.push(first);
        sim_visited[first] = true;
        let mut current = first;

        loop {
            let next = (1..n)
                .filter(|&j| !sim_visited[j])
                .filter(|&j| self.extension_fits(instance, &sim_route, j))
                .min_by(|&a, &b| {
                    step_score(instance, duals, current, a)
                        .total_cmp(&step_score(instance, duals, current, b))
                });

            match next {
                Some(j) => {
                    sim_route.push(j);
                    sim_visited[j] = true;
                    current = j;
                }
                None => break,
            }
        }

        sim_route.push(depot);
        sim_route
    }

    /// Would appending `next` (and returning to the depot) still respect
    /// the duration cap?
    fn extension_fits(&self, instance: &Instance, route: &[usize], next: usize) -> bool {
        let mut extended = route.to_vec();
        extended.push(next);
        extended.push(0);
        route_duration(&extended, instance, self.rules.fixed_overhead)
            <= self.rules.max_shift_duration + FEASIBILITY_EPS
    }

    /// Duration window check for a closed route.
    fn within_bounds(&self, instance: &Instance, route: &[usize]) -> bool {
        let total = route_duration(route, instance, self.rules.fixed_overhead);
        total >= self.rules.min_shift_duration - FEASIBILITY_EPS
            && total <= self.rules.max_shift_duration + FEASIBILITY_EPS
    }
}

impl Pricer for RolloutHeuristic {
    fn price(&self, instance: &Instance, duals: &[f64]) -> Vec<Shift> {
        self.generate(instance, duals)
    }
}
