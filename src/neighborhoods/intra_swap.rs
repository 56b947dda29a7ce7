//! Exchange two stop positions within one route.

use super::{Evaluation, Move, MoveKind, Neighborhood, SearchContext};
use crate::search::objective::ShiftChange;
use crate::shift::Shift;

pub struct IntraSwap;

impl Neighborhood for IntraSwap {
    fn name(&self) -> &'static str {
        "intra-swap"
    }

    fn generate_moves(&self, shifts: &[Shift], _ctx: &SearchContext) -> Vec<Move> {
        let mut moves = Vec::new();

        for (r, shift) in shifts.iter().enumerate() {
            let n = shift.route.len();
            if n < 4 {
                continue;
            }
            // positions 1..n-1 are the non-depot stops
            for i in 1..n - 1 {
                for j in i + 1..n - 1 {
                    moves.push(Move::new(r, r, i, j, MoveKind::IntraSwap));
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
        let node_i = route[i];
        let node_j = route[j];

        let prev_i = route[i - 1];
        let next_j = route[j + 1];

        // Adjacent swaps share the middle edge, so the cancelled terms
        // differ from the general case.
        let (old_cost, new_cost) = if j == i + 1 {
            (
                t(prev_i, node_i) + t(node_i, node_j) + t(node_j, next_j),
                t(prev_i, node_j) + t(node_j, node_i) + t(node_i, next_j),
            )
        } else {
            let next_i = route[i + 1];
            let prev_j = route[j - 1];
            (
                t(prev_i, node_i) + t(node_i, next_i) + t(prev_j, node_j) + t(node_j, next_j),
                t(prev_i, node_j) + t(node_j, next_i) + t(prev_j, node_i) + t(node_i, next_j),
            )
        };

        let travel_delta = old_cost - new_cost;
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
        shift.route.swap(mv.index1, mv.index2);
        shift.recompute(ctx.instance, ctx.rules.fixed_overhead);
    }
}
