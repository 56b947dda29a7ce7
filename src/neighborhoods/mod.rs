//! Move and neighborhood framework for the local search.
//!
//! Each neighborhood enumerates candidate [`Move`]s, evaluates their
//! objective delta incrementally against the current shift list, and
//! applies accepted moves in place. Improvement deltas are defined as
//! `old objective − new objective`, so positive means better.

pub mod inter_shift;
pub mod inter_swap;
pub mod inter_two_opt_star;
pub mod intra_shift;
pub mod intra_swap;
pub mod intra_two_opt;

use crate::config::ShiftRules;
use crate::instance::Instance;
use crate::search::objective::{Objective, ShiftChange, SolutionStats};
use crate::shift::{count_night_shifts, Shift};

pub use inter_shift::InterShift;
pub use inter_swap::InterSwap;
pub use inter_two_opt_star::Inter2OptStar;
pub use intra_shift::IntraShift;
pub use intra_swap::IntraSwap;
pub use intra_two_opt::Intra2Opt;

/// Deltas smaller than this are snapped to zero so float noise never
/// counts as an improvement.
pub(crate) const EPS: f64 = 1e-6;

/// The six supported move types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    IntraSwap,
    IntraShift,
    Intra2Opt,
    InterSwap,
    InterShift,
    Inter2OptStar,
}

/// A candidate move: a plan, not an effect. Indices refer to positions in
/// the routes of the shifts at `route1`/`route2` in the shift list the
/// move was generated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub route1: usize,
    pub route2: usize,
    pub index1: usize,
    pub index2: usize,
    pub kind: MoveKind,
}

impl Move {
    pub fn new(route1: usize, route2: usize, index1: usize, index2: usize, kind: MoveKind) -> Self {
        Move {
            route1,
            route2,
            index1,
            index2,
            kind,
        }
    }
}

/// Outcome of evaluating a move. Infeasible moves carry a zero delta and
/// must never be applied.
#[derive(Debug, Clone, Copy)]
pub struct Evaluation {
    pub delta: f64,
    pub feasible: bool,
}

impl Evaluation {
    pub fn feasible(delta: f64) -> Self {
        let delta = if delta.abs() < EPS { 0.0 } else { delta };
        Evaluation {
            delta,
            feasible: true,
        }
    }

    pub fn infeasible() -> Self {
        Evaluation {
            delta: 0.0,
            feasible: false,
        }
    }
}

/// Read-only context a neighborhood needs to generate and evaluate moves:
/// the instance, the feasibility rules, the active objective and the
/// global statistics of the shift list the moves are generated against.
///
/// Rebuilt before every neighborhood scan so the statistics can never go
/// stale across an applied move.
pub struct SearchContext<'a> {
    pub instance: &'a Instance,
    pub rules: &'a ShiftRules,
    pub objective: &'a Objective,
    pub stats: SolutionStats,
    pub night_shift_count: usize,
}

impl<'a> SearchContext<'a> {
    pub fn new(
        instance: &'a Instance,
        rules: &'a ShiftRules,
        objective: &'a Objective,
        shifts: &[Shift],
    ) -> Self {
        SearchContext {
            instance,
            rules,
            objective,
            stats: SolutionStats::collect(shifts),
            night_shift_count: count_night_shifts(shifts),
        }
    }

    /// True when the night-shift count already sits over the quota; inter
    /// neighborhoods generate nothing in that state.
    pub fn over_night_quota(&self) -> bool {
        self.night_shift_count > self.rules.night_shift_quota
    }

    /// Whether a move between these two shifts is admissible. At the
    /// night-shift quota only same-classification pairs remain, so no move
    /// can push the count over the cap.
    pub fn pair_allowed(&self, a: &Shift, b: &Shift) -> bool {
        if self.night_shift_count < self.rules.night_shift_quota {
            return true;
        }
        a.night_shift == b.night_shift
    }

    /// Objective improvement for the given per-shift duration changes.
    pub fn objective_delta(&self, changes: &[ShiftChange]) -> f64 {
        self.objective.delta(&self.stats, changes)
    }
}

/// Common contract of the six neighborhoods.
pub trait Neighborhood {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Enumerate syntactically valid candidate moves against `shifts`.
    fn generate_moves(&self, shifts: &[Shift], ctx: &SearchContext) -> Vec<Move>;

    /// Incrementally evaluate one move; never recomputes the whole
    /// solution. Moves that would push a touched shift past the maximum
    /// duration come back infeasible.
    fn evaluate_move(&self, mv: &Move, shifts: &[Shift], ctx: &SearchContext) -> Evaluation;

    /// Apply the move in place, recomputing the touched shifts' scalars
    /// and night flags.
    fn apply_move(&self, mv: &Move, shifts: &mut [Shift], ctx: &SearchContext);
}

/// The full neighborhood set, in the order the local search visits them
/// by default.
pub fn standard_neighborhoods() -> Vec<Box<dyn Neighborhood>> {
    vec![
        Box::new(IntraSwap),
        Box::new(IntraShift),
        Box::new(Intra2Opt),
        Box::new(InterSwap),
        Box::new(InterShift),
        Box::new(Inter2OptStar),
    ]
}

/// Only the single-route neighborhoods; used to polish individual pricing
/// candidates where inter-route moves are meaningless.
pub fn intra_neighborhoods() -> Vec<Box<dyn Neighborhood>> {
    vec![
        Box::new(IntraSwap),
        Box::new(IntraShift),
        Box::new(Intra2Opt),
    ]
}
