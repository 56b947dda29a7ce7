//! Exchange one stop between two different routes.

use super::{Evaluation, Move, MoveKind, Neighborhood, SearchContext};
use crate::search::objective::ShiftChange;
use crate::shift::Shift;
use log::warn;

pub struct InterSwap;

impl Neighborhood for InterSwap {
    fn name(&self) -> &'static str {
        "inter-swap"
    }

    fn generate_moves(&self, shifts: &[Shift], ctx: &SearchContext) -> Vec<Move> {
        let mut moves = Vec::new();

        if ctx.over_night_quota() {
            warn!(
                "night-shift quota exceeded ({} > {}), skipping inter-swap",
                ctx.night_shift_count, ctx.rules.night_shift_quota
            );
            return moves;
        }

        for r1 in 0..shifts.len() {
            for r2 in r1 + 1..shifts.len() {
                if !ctx.pair_allowed(&shifts[r1], &shifts[r2]) {
                    continue;
                }

                let len1 = shifts[r1].route.len();
                let len2 = shifts[r2].route.len();

                for i in 1..len1.saturating_sub(1) {
                    for j in 1..len2.saturating_sub(1) {
                        moves.push(Move::new(r1, r2, i, j, MoveKind::InterSwap));
                    }
                }
            }
        }
        moves
    }

    fn evaluate_move(&self, mv: &Move, shifts: &[Shift], ctx: &SearchContext) -> Evaluation {
        let s1 = &shifts[mv.route1];
        let s2 = &shifts[mv.route2];
        let t = |a: usize, b: usize| ctx.instance.travel(a, b);

        let node1 = s1.route[mv.index1];
        let node2 = s2.route[mv.index2];

        let service1 = ctx.instance.stop(node1).service_time;
        let service2 = ctx.instance.stop(node2).service_time;

        let prev1 = s1.route[mv.index1 - 1];
        let next1 = s1.route[mv.index1 + 1];
        let prev2 = s2.route[mv.index2 - 1];
        let next2 = s2.route[mv.index2 + 1];

        let old_r1 = t(prev1, node1) + t(node1, next1);
        let old_r2 = t(prev2, node2) + t(node2, next2);
        let new_r1 = t(prev1, node2) + t(node2, next1);
        let new_r2 = t(prev2, node1) + t(node1, next2);

        let travel_delta1 = old_r1 - new_r1;
        let travel_delta2 = old_r2 - new_r2;

        let new_total1 = s1.total_time - service1 + service2 - travel_delta1;
        let new_total2 = s2.total_time - service2 + service1 - travel_delta2;

        if new_total1 > ctx.rules.max_shift_duration || new_total2 > ctx.rules.max_shift_duration {
            return Evaluation::infeasible();
        }

        let delta = ctx.objective_delta(&[
            ShiftChange {
                old_total: s1.total_time,
                new_total: new_total1,
                old_service: s1.service_time,
                new_service: s1.service_time - service1 + service2,
            },
            ShiftChange {
                old_total: s2.total_time,
                new_total: new_total2,
                old_service: s2.service_time,
                new_service: s2.service_time - service2 + service1,
            },
        ]);
        Evaluation::feasible(delta)
    }

    fn apply_move(&self, mv: &Move, shifts: &mut [Shift], ctx: &SearchContext) {
        let node1 = shifts[mv.route1].route[mv.index1];
        let node2 = shifts[mv.route2].route[mv.index2];

        shifts[mv.route1].route[mv.index1] = node2;
        shifts[mv.route2].route[mv.index2] = node1;

        shifts[mv.route1].recompute(ctx.instance, ctx.rules.fixed_overhead);
        shifts[mv.route2].recompute(ctx.instance, ctx.rules.fixed_overhead);
    }
}
