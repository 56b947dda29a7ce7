//! Greedy nearest-stop construction of an initial shift set.

use crate::config::ShiftRules;
use crate::instance::Instance;
use crate::shift::Shift;
use log::{debug, warn};

/// Build an initial feasible shift set covering `allowed` exactly once.
///
/// Routes are grown from the depot by repeatedly stepping to the closest
/// unvisited allowed stop whose one-stop lookahead (travel there, clean,
/// return directly to the depot, plus the fixed overhead) stays within
/// `shift_length`. When no stop qualifies the route closes and a new one
/// opens. Ties are broken by first index; only a strictly shorter leg
/// replaces the incumbent.
pub fn build_greedy_shifts(
    instance: &Instance,
    allowed: &[usize],
    rules: &ShiftRules,
    shift_length: f64,
) -> Vec<Shift> {
    let n = instance.n_stops();
    let depot = 0usize;

    let mut is_allowed = vec![false; n];
    for &id in allowed {
        is_allowed[id] = true;
    }

    let mut visited = vec![false; n];
    visited[depot] = true;

    let mut remaining = allowed.len();
    let mut shifts = Vec::new();

    while remaining > 0 {
        let mut route = vec![depot];
        let mut current = depot;
        let mut elapsed = 0.0;

        loop {
            let mut next: Option<usize> = None;
            let mut best = f64::INFINITY;

            for j in 1..n {
                if !is_allowed[j] || visited[j] {
                    continue;
                }

                let leg = instance.travel(current, j);
                let back = instance.travel(j, depot);
                let total_if_return =
                    elapsed + leg + instance.stop(j).service_time + back + rules.fixed_overhead;

                if total_if_return <= shift_length && leg < best {
                    best = leg;
                    next = Some(j);
                }
            }

            match next {
                Some(j) => {
                    elapsed += instance.travel(current, j) + instance.stop(j).service_time;
                    current = j;
                    route.push(j);
                    visited[j] = true;
                    remaining -= 1;
                }
                None => {
                    // An empty route that fits nothing means the
                    // remaining stops cannot be served at all under this
                    // cap; emitting it would loop forever.
                    if route.len() == 1 {
                        warn!(
                            "{} allowed stops do not fit any shift of length {}",
                            remaining, shift_length
                        );
                        return shifts;
                    }
                    route.push(depot);
                    shifts.push(Shift::new(route, instance, rules.fixed_overhead));
                    break;
                }
            }
        }
    }

    debug!(
        "greedy construction: {} shifts over {} stops",
        shifts.len(),
        allowed.len()
    );

    shifts
}
