//! Objective functions over a shift set.

use crate::shift::Shift;
use serde::{Deserialize, Serialize};

/// Global sums needed to evaluate the balanced objective in O(1) per
/// candidate move. Recomputed once per neighborhood scan, never trusted
/// across an applied move.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolutionStats {
    pub count: usize,
    pub sum_total: f64,
    pub sum_total_sq: f64,
    pub sum_service: f64,
    pub sum_service_sq: f64,
}

impl SolutionStats {
    pub fn collect(shifts: &[Shift]) -> Self {
        let mut stats = SolutionStats {
            count: shifts.len(),
            ..Default::default()
        };
        for shift in shifts {
            stats.sum_total += shift.total_time;
            stats.sum_total_sq += shift.total_time * shift.total_time;
            stats.sum_service += shift.service_time;
            stats.sum_service_sq += shift.service_time * shift.service_time;
        }
        stats
    }
}

/// The duration change a candidate move would inflict on one shift.
#[derive(Debug, Clone, Copy)]
pub struct ShiftChange {
    pub old_total: f64,
    pub new_total: f64,
    pub old_service: f64,
    pub new_service: f64,
}

/// Total-length objective with optional variance penalties on shift
/// length and on cleaning load:
///
/// `Σ total + λ_L · SSE(total) + λ_C · SSE(service)`
///
/// where `SSE(x) = Σx² − (Σx)²/m`. With both lambdas zero this is the
/// plain total-time sum.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Objective {
    pub lambda_length: f64,
    pub lambda_service: f64,
}

impl Objective {
    /// Plain sum of shift durations.
    pub fn total_length() -> Self {
        Objective {
            lambda_length: 0.0,
            lambda_service: 0.0,
        }
    }

    /// Balanced objective penalizing unequal shift lengths and loads.
    pub fn balanced(lambda_length: f64, lambda_service: f64) -> Self {
        Objective {
            lambda_length,
            lambda_service,
        }
    }

    /// Full evaluation from scratch.
    pub fn evaluate(&self, shifts: &[Shift]) -> f64 {
        self.from_stats(&SolutionStats::collect(shifts))
    }

    fn from_stats(&self, stats: &SolutionStats) -> f64 {
        if stats.count == 0 {
            return 0.0;
        }
        let m = stats.count as f64;
        let sse_total = stats.sum_total_sq - stats.sum_total * stats.sum_total / m;
        let sse_service = stats.sum_service_sq - stats.sum_service * stats.sum_service / m;
        stats.sum_total + self.lambda_length * sse_total + self.lambda_service * sse_service
    }

    /// Objective improvement (`old − new`, positive = better) of a move
    /// described by the duration changes of the shifts it touches. O(1) in
    /// the number of shifts.
    pub fn delta(&self, stats: &SolutionStats, changes: &[ShiftChange]) -> f64 {
        let mut updated = *stats;
        for change in changes {
            updated.sum_total += change.new_total - change.old_total;
            updated.sum_total_sq +=
                change.new_total * change.new_total - change.old_total * change.old_total;
            updated.sum_service += change.new_service - change.old_service;
            updated.sum_service_sq +=
                change.new_service * change.new_service - change.old_service * change.old_service;
        }
        self.from_stats(stats) - self.from_stats(&updated)
    }
}
