//! Solution diagnostics: coverage/duration feasibility checks and
//! summary statistics over a finished shift plan.

use crate::config::ShiftRules;
use crate::instance::Instance;
use crate::shift::{count_night_shifts, Shift};
use serde::Serialize;
use std::collections::BTreeMap;

/// Diagnostic produced by [`check_feasibility`]. Violations are listed,
/// not raised; callers decide how severe each finding is.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FeasibilityReport {
    /// Stops covered by more than one shift, with their visit counts.
    pub duplicate_stops: Vec<(usize, usize)>,
    /// Stops the plan never visits.
    pub missing_stops: Vec<usize>,
    /// Indices of shifts outside the duration window, with totals.
    pub duration_violations: Vec<(usize, f64)>,
    pub night_shift_count: usize,
    pub quota_exceeded: bool,
}

impl FeasibilityReport {
    pub fn is_feasible(&self) -> bool {
        self.duplicate_stops.is_empty()
            && self.missing_stops.is_empty()
            && self.duration_violations.is_empty()
            && !self.quota_exceeded
    }
}

/// Check a plan against the instance: every non-depot stop covered
/// exactly once, every shift inside the duration window, night quota
/// respected.
pub fn check_feasibility(
    shifts: &[Shift],
    instance: &Instance,
    rules: &ShiftRules,
) -> FeasibilityReport {
    let mut coverage: BTreeMap<usize, usize> = BTreeMap::new();
    for shift in shifts {
        for &stop in shift.unique_stops().iter() {
            *coverage.entry(stop).or_insert(0) += 1;
        }
    }

    let duplicate_stops = coverage
        .iter()
        .filter(|(_, &count)| count > 1)
        .map(|(&stop, &count)| (stop, count))
        .collect();

    let missing_stops = (1..instance.n_stops())
        .filter(|stop| !coverage.contains_key(stop))
        .collect();

    let duration_violations = shifts
        .iter()
        .enumerate()
        .filter(|(_, s)| {
            s.total_time > rules.max_shift_duration || s.total_time < rules.min_shift_duration
        })
        .map(|(i, s)| (i, s.total_time))
        .collect();

    let night_shift_count = count_night_shifts(shifts);

    FeasibilityReport {
        duplicate_stops,
        missing_stops,
        duration_violations,
        night_shift_count,
        quota_exceeded: night_shift_count > rules.night_shift_quota,
    }
}

/// Aggregates for one group of shifts.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct GroupStats {
    pub count: usize,
    pub stops: usize,
    pub total_time: f64,
    pub travel_time: f64,
    pub service_time: f64,
    pub mean_time: f64,
    pub min_time: f64,
    pub max_time: f64,
}

impl GroupStats {
    fn collect<'a, I: Iterator<Item = &'a Shift>>(shifts: I) -> Self {
        let mut stats = GroupStats {
            min_time: f64::INFINITY,
            max_time: f64::NEG_INFINITY,
            ..GroupStats::default()
        };

        for shift in shifts {
            stats.count += 1;
            stats.stops += shift.stop_count();
            stats.total_time += shift.total_time;
            stats.travel_time += shift.travel_time;
            stats.service_time += shift.service_time;
            stats.min_time = stats.min_time.min(shift.total_time);
            stats.max_time = stats.max_time.max(shift.total_time);
        }

        if stats.count == 0 {
            stats.min_time = 0.0;
            stats.max_time = 0.0;
        } else {
            stats.mean_time = stats.total_time / stats.count as f64;
        }
        stats
    }
}

/// Day/night/overall breakdown of a shift plan.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ShiftStatistics {
    pub day: GroupStats,
    pub night: GroupStats,
    pub overall: GroupStats,
}

impl ShiftStatistics {
    pub fn compute(shifts: &[Shift]) -> Self {
        ShiftStatistics {
            day: GroupStats::collect(shifts.iter().filter(|s| !s.night_shift)),
            night: GroupStats::collect(shifts.iter().filter(|s| s.night_shift)),
            overall: GroupStats::collect(shifts.iter()),
        }
    }
}
