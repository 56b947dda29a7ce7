//! Integration tests for the six neighborhoods: incremental deltas
//! against full recomputes, feasibility refusal, and quota handling.

use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use shift_opt::config::ShiftRules;
use shift_opt::instance::{Instance, Stop};
use shift_opt::neighborhoods::{
    standard_neighborhoods, Move, MoveKind, SearchContext,
};
use shift_opt::search::Objective;
use shift_opt::shift::{recompute_all, Shift};

/// Random asymmetric instance with `n` stops (depot included). Every
/// fifth stop is night-only.
fn random_instance(rng: &mut ChaCha8Rng, n: usize) -> Instance {
    let stops = (0..n)
        .map(|i| {
            let service = if i == 0 { 0.0 } else { rng.gen_range(3.0..8.0) };
            Stop::new(i, i != 0 && i % 5 == 0, service, 0.0, 0.0)
        })
        .collect();

    let travel = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| if i == j { 0.0 } else { rng.gen_range(5.0..40.0) })
                .collect()
        })
        .collect();

    match Instance::new(stops, travel) {
        Ok(instance) => instance,
        Err(e) => panic!("test instance: {e}"),
    }
}

/// Partition the non-depot stops into `routes` closed routes, in a
/// shuffled order.
fn random_solution(
    rng: &mut ChaCha8Rng,
    instance: &Instance,
    routes: usize,
    rules: &ShiftRules,
) -> Vec<Shift> {
    let n = instance.n_stops();
    let mut stops: Vec<usize> = (1..n).collect();
    stops.shuffle(rng);

    let chunk = (stops.len() + routes - 1) / routes;
    stops
        .chunks(chunk.max(1))
        .map(|part| {
            let mut route = vec![0];
            route.extend_from_slice(part);
            route.push(0);
            Shift::new(route, instance, rules.fixed_overhead)
        })
        .collect()
}

fn loose_rules() -> ShiftRules {
    ShiftRules {
        max_shift_duration: 10_000.0,
        min_shift_duration: 0.0,
        fixed_overhead: 60.0,
        night_shift_quota: 25,
    }
}

/// For 100 randomized instances, every feasible move's incremental delta
/// must match a full recompute of old − new, under both objectives.
#[test]
fn test_delta_matches_full_recompute() {
    let rules = loose_rules();
    let objectives = [Objective::total_length(), Objective::balanced(1.0, 1.0)];
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    for trial in 0..100 {
        let n = rng.gen_range(8..14);
        let instance = random_instance(&mut rng, n);
        let routes = rng.gen_range(2..5);
        let shifts = random_solution(&mut rng, &instance, routes, &rules);

        for objective in &objectives {
            let ctx = SearchContext::new(&instance, &rules, objective, &shifts);
            let before = objective.evaluate(&shifts);

            for neighborhood in standard_neighborhoods() {
                for mv in neighborhood.generate_moves(&shifts, &ctx) {
                    let eval = neighborhood.evaluate_move(&mv, &shifts, &ctx);
                    if !eval.feasible {
                        continue;
                    }

                    let mut applied = shifts.clone();
                    neighborhood.apply_move(&mv, &mut applied, &ctx);
                    recompute_all(&mut applied, &instance, rules.fixed_overhead);
                    let after = objective.evaluate(&applied);

                    assert!(
                        (eval.delta - (before - after)).abs() < 1e-6,
                        "trial {trial}, {}: delta {} but full recompute {}",
                        neighborhood.name(),
                        eval.delta,
                        before - after
                    );
                }
            }
        }
    }
}

#[test]
fn test_intra_swap_edge_algebra() {
    // Asymmetric 3-stop matrix with known values.
    let stops = vec![
        Stop::new(0, false, 0.0, 0.0, 0.0),
        Stop::new(1, false, 5.0, 0.0, 0.0),
        Stop::new(2, false, 5.0, 0.0, 0.0),
    ];
    let travel = vec![
        vec![0.0, 10.0, 15.0],
        vec![11.0, 0.0, 5.0],
        vec![12.0, 6.0, 0.0],
    ];
    let instance = match Instance::new(stops, travel) {
        Ok(instance) => instance,
        Err(e) => panic!("test instance: {e}"),
    };
    let rules = loose_rules();
    let objective = Objective::total_length();

    let shifts = vec![Shift::new(vec![0, 1, 2, 0], &instance, rules.fixed_overhead)];
    let ctx = SearchContext::new(&instance, &rules, &objective, &shifts);

    let mv = Move::new(0, 0, 1, 2, MoveKind::IntraSwap);
    let neighborhoods = standard_neighborhoods();
    let eval = neighborhoods[0].evaluate_move(&mv, &shifts, &ctx);

    // old = d[0][1] + d[1][2] + d[2][0] = 10 + 5 + 12 = 27
    // new = d[0][2] + d[2][1] + d[1][0] = 15 + 6 + 11 = 32
    assert!(eval.feasible);
    assert!((eval.delta - (27.0 - 32.0)).abs() < 1e-9);
}

#[test]
fn test_moves_over_duration_cap_are_infeasible() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let instance = random_instance(&mut rng, 10);

    // Tight cap: the initial routes fit, but most rearrangements of the
    // longer asymmetric legs do not. Every infeasible evaluation must
    // also leave the solution untouched when skipped.
    let mut rules = loose_rules();
    let shifts = random_solution(&mut rng, &instance, 3, &rules);
    let longest = shifts
        .iter()
        .map(|s| s.total_time)
        .fold(f64::NEG_INFINITY, f64::max);
    rules.max_shift_duration = longest + 1.0;

    let objective = Objective::total_length();
    let ctx = SearchContext::new(&instance, &rules, &objective, &shifts);

    let mut saw_infeasible = false;
    for neighborhood in standard_neighborhoods() {
        for mv in neighborhood.generate_moves(&shifts, &ctx) {
            let eval = neighborhood.evaluate_move(&mv, &shifts, &ctx);
            if !eval.feasible {
                saw_infeasible = true;
                assert_eq!(eval.delta, 0.0);
            }
        }
    }
    assert!(saw_infeasible, "expected at least one infeasible move");
}

#[test]
fn test_inter_moves_blocked_at_night_quota() {
    let stops = vec![
        Stop::new(0, false, 0.0, 0.0, 0.0),
        Stop::new(1, false, 5.0, 0.0, 0.0),
        Stop::new(2, false, 5.0, 0.0, 0.0),
        Stop::new(3, true, 5.0, 0.0, 0.0),
        Stop::new(4, true, 5.0, 0.0, 0.0),
    ];
    let travel = vec![vec![10.0; 5]; 5];
    let instance = match Instance::new(stops, travel) {
        Ok(instance) => instance,
        Err(e) => panic!("test instance: {e}"),
    };

    // Quota of exactly one night shift, already used by the night route.
    let rules = ShiftRules {
        night_shift_quota: 1,
        ..loose_rules()
    };
    let shifts = vec![
        Shift::new(vec![0, 1, 2, 0], &instance, rules.fixed_overhead),
        Shift::new(vec![0, 3, 4, 0], &instance, rules.fixed_overhead),
    ];
    let objective = Objective::total_length();
    let ctx = SearchContext::new(&instance, &rules, &objective, &shifts);

    // One day and one night shift: cross-classification inter moves
    // could re-flag the day shift, so none may be generated.
    for neighborhood in standard_neighborhoods() {
        for mv in neighborhood.generate_moves(&shifts, &ctx) {
            assert_eq!(
                mv.route1, mv.route2,
                "{} generated a cross-route move at the quota",
                neighborhood.name()
            );
        }
    }
}
