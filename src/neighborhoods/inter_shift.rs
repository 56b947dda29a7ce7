//! Relocate one stop from its route into the cheapest insertion slot of
//! another route.

use super::{Evaluation, Move, MoveKind, Neighborhood, SearchContext};
use crate::search::objective::ShiftChange;
use crate::shift::Shift;
use log::warn;

pub struct InterShift;

impl InterShift {
    /// Cheapest insertion slot for `node` in `route`, scanning every
    /// position between consecutive visits. Returns the slot index (the
    /// node would be inserted before `route[slot]`) and the insertion
    /// cost `d[prev][node] + d[node][next] − d[prev][next]`.
    fn best_insertion(route: &[usize], node: usize, ctx: &SearchContext) -> (usize, f64) {
        let t = |a: usize, b: usize| ctx.instance.travel(a, b);

        let mut best_slot = 1;
        let mut best_cost = f64::INFINITY;

        for slot in 1..route.len() {
            let prev = route[slot - 1];
            let next = route[slot];
            let cost = t(prev, node) + t(node, next) - t(prev, next);
            if cost < best_cost {
                best_cost = cost;
                best_slot = slot;
            }
        }

        (best_slot, best_cost)
    }
}

impl Neighborhood for InterShift {
    fn name(&self) -> &'static str {
        "inter-shift"
    }

    fn generate_moves(&self, shifts: &[Shift], ctx: &SearchContext) -> Vec<Move> {
        let mut moves = Vec::new();

        if ctx.over_night_quota() {
            warn!(
                "night-shift quota exceeded ({} > {}), skipping inter-shift",
                ctx.night_shift_count, ctx.rules.night_shift_quota
            );
            return moves;
        }

        for r1 in 0..shifts.len() {
            for r2 in 0..shifts.len() {
                if r1 == r2 || !ctx.pair_allowed(&shifts[r1], &shifts[r2]) {
                    continue;
                }
                if shifts[r2].route.len() < 2 {
                    continue;
                }

                let len1 = shifts[r1].route.len();
                for i in 1..len1.saturating_sub(1) {
                    let node = shifts[r1].route[i];
                    let (slot, _) = Self::best_insertion(&shifts[r2].route, node, ctx);
                    moves.push(Move::new(r1, r2, i, slot, MoveKind::InterShift));
                }
            }
        }
        moves
    }

    fn evaluate_move(&self, mv: &Move, shifts: &[Shift], ctx: &SearchContext) -> Evaluation {
        let s1 = &shifts[mv.route1];
        let s2 = &shifts[mv.route2];
        let t = |a: usize, b: usize| ctx.instance.travel(a, b);

        let node = s1.route[mv.index1];
        let service = ctx.instance.stop(node).service_time;

        let prev1 = s1.route[mv.index1 - 1];
        let next1 = s1.route[mv.index1 + 1];
        let removal_gain = t(prev1, node) + t(node, next1) - t(prev1, next1);

        let prev2 = s2.route[mv.index2 - 1];
        let next2 = s2.route[mv.index2];
        let insertion_cost = t(prev2, node) + t(node, next2) - t(prev2, next2);

        let new_total1 = s1.total_time - removal_gain - service;
        let new_total2 = s2.total_time + insertion_cost + service;

        if new_total1 > ctx.rules.max_shift_duration || new_total2 > ctx.rules.max_shift_duration {
            return Evaluation::infeasible();
        }

        let delta = ctx.objective_delta(&[
            ShiftChange {
                old_total: s1.total_time,
                new_total: new_total1,
                old_service: s1.service_time,
                new_service: s1.service_time - service,
            },
            ShiftChange {
                old_total: s2.total_time,
                new_total: new_total2,
                old_service: s2.service_time,
                new_service: s2.service_time + service,
            },
        ]);
        Evaluation::feasible(delta)
    }

    fn apply_move(&self, mv: &Move, shifts: &mut [Shift], ctx: &SearchContext) {
        let node = shifts[mv.route1].route.remove(mv.index1);
        shifts[mv.route2].route.insert(mv.index2, node);

        shifts[mv.route1].recompute(ctx.instance, ctx.rules.fixed_overhead);
        shifts[mv.route2].recompute(ctx.instance, ctx.rules.fixed_overhead);
    }
}
