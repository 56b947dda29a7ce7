//! Tail splice between two routes (inter-route 2-opt).
//!
//! Cutting route A after `index1` and route B after `index2`, the new
//! routes are head(A)+tail(B) and head(B)+tail(A). Because the stop-set
//! membership of both routes changes wholesale, durations are recomputed
//! from scratch instead of via edge algebra; this is a deliberate
//! simplification.

use super::{Evaluation, Move, MoveKind, Neighborhood, SearchContext};
use crate::search::objective::ShiftChange;
use crate::shift::{route_times, Shift};
use log::warn;

pub struct Inter2OptStar;

impl Inter2OptStar {
    fn spliced_routes(mv: &Move, shifts: &[Shift]) -> (Vec<usize>, Vec<usize>) {
        let r1 = &shifts[mv.route1].route;
        let r2 = &shifts[mv.route2].route;

        let mut new_r1 = r1[..=mv.index1].to_vec();
        new_r1.extend_from_slice(&r2[mv.index2 + 1..]);

        let mut new_r2 = r2[..=mv.index2].to_vec();
        new_r2.extend_from_slice(&r1[mv.index1 + 1..]);

        (new_r1, new_r2)
    }
}

impl Neighborhood for Inter2OptStar {
    fn name(&self) -> &'static str {
        "inter-2opt-star"
    }

    fn generate_moves(&self, shifts: &[Shift], ctx: &SearchContext) -> Vec<Move> {
        let mut moves = Vec::new();

        if ctx.over_night_quota() {
            warn!(
                "night-shift quota exceeded ({} > {}), skipping inter-2opt-star",
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

                // split points leave the closing depot inside each tail
                for i in 0..len1.saturating_sub(2) {
                    for j in 0..len2.saturating_sub(2) {
                        moves.push(Move::new(r1, r2, i, j, MoveKind::Inter2OptStar));
                    }
                }
            }
        }
        moves
    }

    fn evaluate_move(&self, mv: &Move, shifts: &[Shift], ctx: &SearchContext) -> Evaluation {
        let s1 = &shifts[mv.route1];
        let s2 = &shifts[mv.route2];

        let (new_r1, new_r2) = Self::spliced_routes(mv, shifts);

        let (travel1, service1) = route_times(&new_r1, ctx.instance);
        let (travel2, service2) = route_times(&new_r2, ctx.instance);

        let new_total1 = travel1 + service1 + ctx.rules.fixed_overhead;
        let new_total2 = travel2 + service2 + ctx.rules.fixed_overhead;

        if new_total1 > ctx.rules.max_shift_duration || new_total2 > ctx.rules.max_shift_duration {
            return Evaluation::infeasible();
        }

        let delta = ctx.objective_delta(&[
            ShiftChange {
                old_total: s1.total_time,
                new_total: new_total1,
                old_service: s1.service_time,
                new_service: service1,
            },
            ShiftChange {
                old_total: s2.total_time,
                new_total: new_total2,
                old_service: s2.service_time,
                new_service: service2,
            },
        ]);
        Evaluation::feasible(delta)
    }

    fn apply_move(&self, mv: &Move, shifts: &mut [Shift], ctx: &SearchContext) {
        let (new_r1, new_r2) = Self::spliced_routes(mv, shifts);

        shifts[mv.route1].route = new_r1;
        shifts[mv.route2].route = new_r2;

        shifts[mv.route1].recompute(ctx.instance, ctx.rules.fixed_overhead);
        shifts[mv.route2].recompute(ctx.instance, ctx.rules.fixed_overhead);
    }
}
