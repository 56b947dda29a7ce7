//! Relocate one stop to a different position within the same route.

use super::{Evaluation, Move, MoveKind, Neighborhood, SearchContext};
use crate::search::objective::ShiftChange;
use crate::shift::Shift;

pub struct IntraShift;

impl Neighborhood for IntraShift {
    fn name(&self) -> &'static str {
        "intra-shift"
    }

    fn generate_moves(&self, shifts: &[Shift], _ctx: &SearchContext) -> Vec<Move> {
        let mut moves = Vec::new();

        for (r, shift) in shifts.iter().enumerate() {
            let n = shift.route.len();
            if n < 4 {
                continue;
            }
            for i in 1..n - 1 {
                // index2 addresses the route with the stop already removed
                for j in 1..n - 1 {
                    if i == j {
                        continue;
                    }
                    moves.push(Move::new(r, r, i, j, MoveKind::IntraShift));
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
        let node = route[i];

        let prev_i = route[i - 1];
        let next_i = route[i + 1];

        let delta_remove = t(prev_i, node) + t(node, next_i) - t(prev_i, next_i);

        // Neighbors of the insertion slot, read from the route as it
        // looks after the removal.
        let removed_at = |k: usize| if k < i { route[k] } else { route[k + 1] };
        let prev_j = removed_at(j - 1);
        let next_j = removed_at(j);

        let delta_insert = t(prev_j, next_j) - t(prev_j, node) - t(node, next_j);

        let travel_delta = delta_remove + delta_insert;
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
        let node = shift.route.remove(mv.index1);
        shift.route.insert(mv.index2, node);
        shift.recompute(ctx.instance, ctx.rules.fixed_overhead);
    }
}
