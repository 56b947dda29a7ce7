//! Shift representation: a depot-to-depot route with derived scalars.

use crate::instance::Instance;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// One crew shift: an ordered route starting and ending at the depot
/// (stop 0), plus scalars derived from the route.
///
/// Every mutation of `route` must be followed by [`Shift::recompute`]
/// before the shift is read again; the scalars are never trusted across a
/// route change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
    /// Stop ids, beginning and ending with the depot id 0.
    pub route: Vec<usize>,
    /// Sum of consecutive travel-time legs, depot legs included.
    pub travel_time: f64,
    /// Sum of the non-depot stops' service times.
    pub service_time: f64,
    /// `travel_time + service_time + fixed_overhead`.
    pub total_time: f64,
    /// True iff the route visits at least one night-only stop.
    pub night_shift: bool,
}

impl Shift {
    /// Build a shift from a closed route, computing all derived scalars.
    pub fn new(route: Vec<usize>, instance: &Instance, fixed_overhead: f64) -> Self {
        let mut shift = Shift {
            route,
            travel_time: 0.0,
            service_time: 0.0,
            total_time: 0.0,
            night_shift: false,
        };
        shift.recompute(instance, fixed_overhead);
        shift
    }

    /// Recompute travel time, service time, total time and the night flag
    /// from the current route.
    pub fn recompute(&mut self, instance: &Instance, fixed_overhead: f64) {
        let (travel, service) = route_times(&self.route, instance);
        self.travel_time = travel;
        self.service_time = service;
        self.total_time = travel + service + fixed_overhead;
        self.night_shift = route_has_night_stop(&self.route, instance);
    }

    /// Number of non-depot visits on the route.
    pub fn stop_count(&self) -> usize {
        self.route.iter().filter(|&&id| id != 0).count()
    }

    /// Sorted unique non-depot stop ids.
    pub fn unique_stops(&self) -> Vec<usize> {
        let mut stops: Vec<usize> = self.route.iter().copied().filter(|&id| id != 0).collect();
        stops.sort_unstable();
        stops.dedup();
        stops
    }

    /// Hash of the unique stop set, used to spot duplicate shifts.
    pub fn signature(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.unique_stops().hash(&mut hasher);
        hasher.finish()
    }
}

/// Travel and service time of a closed route, as a pair.
pub fn route_times(route: &[usize], instance: &Instance) -> (f64, f64) {
    let travel: f64 = route
        .iter()
        .tuple_windows()
        .map(|(&a, &b)| instance.travel(a, b))
        .sum();
    let service: f64 = route
        .iter()
        .filter(|&&id| id != 0)
        .map(|&id| instance.stop(id).service_time)
        .sum();
    (travel, service)
}

/// Total duration of a closed route including the fixed overhead.
pub fn route_duration(route: &[usize], instance: &Instance, fixed_overhead: f64) -> f64 {
    let (travel, service) = route_times(route, instance);
    travel + service + fixed_overhead
}

/// True iff the route visits a night-only stop.
pub fn route_has_night_stop(route: &[usize], instance: &Instance) -> bool {
    route.iter().any(|&id| instance.stop(id).night_only)
}

/// Defensive full recompute of every shift's derived scalars.
pub fn recompute_all(shifts: &mut [Shift], instance: &Instance, fixed_overhead: f64) {
    for shift in shifts {
        shift.recompute(instance, fixed_overhead);
    }
}

/// Number of night shifts in a solution.
pub fn count_night_shifts(shifts: &[Shift]) -> usize {
    shifts.iter().filter(|s| s.night_shift).count()
}

/// Jaccard similarity of two shifts' unique stop sets. Both inputs must be
/// sorted, which `Shift::unique_stops` guarantees.
pub fn jaccard_similarity(a: &[usize], b: &[usize]) -> f64 {
    let mut i = 0;
    let mut j = 0;
    let mut intersection = 0usize;

    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            intersection += 1;
            i += 1;
            j += 1;
        } else if a[i] < b[j] {
            i += 1;
        } else {
            j += 1;
        }
    }

    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}
