//! Configuration parameters for the shift optimization engine.
//!
//! Every limit the engine enforces is injected here; the core modules carry
//! no hard-coded durations or quotas.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Feasibility rules shared by the constructor, the neighborhoods, the
/// pricing heuristics and the feasibility checker.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShiftRules {
    /// Hard cap on a shift's total duration, in minutes.
    pub max_shift_duration: f64,
    /// Shifts shorter than this are rejected by the pricing heuristics.
    pub min_shift_duration: f64,
    /// Break plus preparation time added to every shift, in minutes.
    pub fixed_overhead: f64,
    /// Cap on the number of night shifts across a solution.
    pub night_shift_quota: usize,
}

impl Default for ShiftRules {
    fn default() -> Self {
        ShiftRules {
            max_shift_duration: 8.0 * 60.0,
            min_shift_duration: 6.0 * 60.0,
            fixed_overhead: 60.0,
            night_shift_quota: 25,
        }
    }
}

/// Configuration settings for the whole engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub rules: ShiftRules,
    /// Duration target used by the greedy constructor; typically tighter
    /// than `rules.max_shift_duration` to leave slack for local search.
    pub construction_shift_length: f64,
    /// Initial temperature for simulated annealing.
    pub initial_temperature: f64,
    /// Geometric cooling factor applied once per local-search iteration.
    pub cooling_rate: f64,
    /// Maximum number of outer local-search iterations.
    pub max_iterations: u32,
    /// Optional wall-clock budget, checked at iteration boundaries.
    pub time_limit: Option<Duration>,
    /// RCL tolerance: candidates within `best + alpha * |best|` qualify.
    pub rcl_alpha: f64,
    /// Independent route constructions per shuffled start stop.
    pub restarts_per_start: usize,
    /// Cap on the raw candidate pool built by the pricing restarts.
    pub candidate_pool_size: usize,
    /// Jaccard similarity above which a candidate is dropped as a
    /// near-duplicate of an already kept one.
    pub similarity_threshold: f64,
    /// Maximum number of columns handed to the master problem per round.
    pub max_keep: usize,
    /// Full route constructions per rollout pricing call.
    pub rollout_runs: usize,
    /// Top-K extension candidates evaluated by lookahead per rollout step.
    pub rollout_candidate_pool: usize,
    /// Base seed; every PRNG in the engine derives from it.
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rules: ShiftRules::default(),
            construction_shift_length: 7.0 * 60.0,
            initial_temperature: 100.0,
            cooling_rate: 0.98,
            max_iterations: 10_000,
            time_limit: None,
            rcl_alpha: 0.3,
            restarts_per_start: 3,
            candidate_pool_size: 300,
            similarity_threshold: 0.75,
            max_keep: 100,
            rollout_runs: 20,
            rollout_candidate_pool: 10,
            seed: 10,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Set the maximum shift duration in minutes.
    pub fn with_max_shift_duration(mut self, minutes: f64) -> Self {
        self.rules.max_shift_duration = minutes;
        self
    }

    /// Set the minimum shift duration in minutes.
    pub fn with_min_shift_duration(mut self, minutes: f64) -> Self {
        self.rules.min_shift_duration = minutes;
        self
    }

    /// Set the fixed break plus preparation overhead in minutes.
    pub fn with_fixed_overhead(mut self, minutes: f64) -> Self {
        self.rules.fixed_overhead = minutes;
        self
    }

    /// Set the night-shift quota.
    pub fn with_night_shift_quota(mut self, quota: usize) -> Self {
        self.rules.night_shift_quota = quota;
        self
    }

    /// Set the duration target for greedy construction.
    pub fn with_construction_shift_length(mut self, minutes: f64) -> Self {
        self.construction_shift_length = minutes;
        self
    }

    /// Set the simulated-annealing start temperature.
    pub fn with_initial_temperature(mut self, temperature: f64) -> Self {
        self.initial_temperature = temperature;
        self
    }

    /// Set the simulated-annealing cooling rate.
    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    /// Set the maximum number of local-search iterations.
    pub fn with_max_iterations(mut self, iterations: u32) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Set the wall-clock time limit.
    pub fn with_time_limit(mut self, duration: Duration) -> Self {
        self.time_limit = Some(duration);
        self
    }

    /// Set the RCL tolerance parameter.
    pub fn with_rcl_alpha(mut self, alpha: f64) -> Self {
        self.rcl_alpha = alpha;
        self
    }

    /// Set the number of pricing restarts per start stop.
    pub fn with_restarts_per_start(mut self, restarts: usize) -> Self {
        self.restarts_per_start = restarts;
        self
    }

    /// Set the raw candidate pool cap.
    pub fn with_candidate_pool_size(mut self, size: usize) -> Self {
        self.candidate_pool_size = size;
        self
    }

    /// Set the deduplication similarity threshold.
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Set the maximum number of columns kept per pricing round.
    pub fn with_max_keep(mut self, max_keep: usize) -> Self {
        self.max_keep = max_keep;
        self
    }

    /// Set the number of rollout constructions per pricing call.
    pub fn with_rollout_runs(mut self, runs: usize) -> Self {
        self.rollout_runs = runs;
        self
    }

    /// Set the rollout lookahead pool size.
    pub fn with_rollout_candidate_pool(mut self, size: usize) -> Self {
        self.rollout_candidate_pool = size;
        self
    }

    /// Set the base PRNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
