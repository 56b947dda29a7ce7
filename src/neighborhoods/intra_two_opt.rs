//! Reverse a contiguous segment of one route (2-opt).

use super::{Evaluation, Move, MoveKind, Neighborhood, SearchContext};
use crate::search::objective::ShiftChange;
use crate::shift::Shift;

pub struct Intra2Opt;

impl Neighborhood for Intra2Opt {
    fn name(&self) -> &'static str {
        "intra-2opt"
    }

    fn generate_moves(&self, shifts: &[Shift], _ctx: &SearchContext) -> Vec<Move> {
        let mut moves = Vec::new();

        for (r, shift) in shifts.iter().enumerate() {
            let n = shift.route.len();
            if n < 4 {
                continue;
            }
            for i in 1..n - 1 {
                for j in i + 1..n - 1 {
                    moves.push(Move::new(r, r, i, j, MoveKind::Intra2Opt));
                }
            }
        }
        moves
    }

    fn evaluate_move(&self, mv: &Move, shifts: &[Shift], ctx: &SearchContext) -> Evaluation {
        let shift = &shifts[mv.route1];
        let route = &shift.route;
        let t = |a: usize, b: usize| ctx.instance.travel(a, b);

        let i = mv.index1;
        let j = mv.index2;

        let a = route[i - 1];
        let b = route[i];
        let c = route[j];
        let d = route[j + 1];

        let delta_boundary = t(a, b) + t(c, d) - t(a, c) - t(b, d);

        // With an asymmetric matrix the interior edges change cost when
        // traversed backwards.
        let mut forward = 0.0;
        let mut reversed = 0.0;
        for k in i..j {
            forward += t(route[k], route[k + 1]);
            reversed += t(route[k + 1], route[k]);
        }

        let travel_delta = delta_boundary + forward - reversed;
        let new_total = shift.total_time - travel_delta;

        if new_total > ctx.rules.max_shift_duration {
            return Evaluation::infeasible();
        }

        let delta = ctx.objective_delta(&[ShiftChange {
            old_total: shift.total_time,
            new_total,
            old_service: shift.service_time,
            new_service: shift.service_time,
        }]);
        Evaluation::feasible(delta)
    }

    fn apply_move(&self, mv: &Move, shifts: &mut [Shift], ctx: &SearchContext) {
        let shift = &mut shifts[mv.route1];
        shift.route[mv.index1..=mv.index2].reverse();
        shift.recompute(ctx.instance, ctx.rules.fixed_overhead);
    }
}
