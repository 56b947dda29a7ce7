//! Column generation scaffolding: the master-problem interface and the
//! loop that alternates between solving it and pricing new shifts.
//!
//! The crate does not ship an LP solver. Callers plug one in behind
//! [`MasterProblem`]; the loop only needs columns in, duals out.

use crate::instance::Instance;
use crate::pricing::Pricer;
use crate::shift::Shift;
use log::{info, warn};
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum MasterError {
    /// The restricted master problem has no feasible solution, usually
    /// because the initial column set fails to cover every stop.
    Infeasible,
    /// Solver backend failure with a backend-specific message.
    Solver(String),
}

impl fmt::Display for MasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MasterError::Infeasible => write!(f, "restricted master problem is infeasible"),
            MasterError::Solver(msg) => write!(f, "master solver failed: {msg}"),
        }
    }
}

impl Error for MasterError {}

/// Restricted master problem of the set-covering formulation. One column
/// per shift; duals indexed as `duals()[0]` for the shift-count
/// constraint and `duals()[j]` for covering stop `j`.
pub trait MasterProblem {
    fn add_columns(&mut self, columns: Vec<Shift>);

    fn solve(&mut self) -> Result<(), MasterError>;

    /// True when the last solve found the restricted problem infeasible.
    /// Backends that surface this through [`MasterError::Infeasible`]
    /// from `solve` can leave the default.
    fn is_infeasible(&self) -> bool {
        false
    }

    fn duals(&self) -> Vec<f64>;
}

/// Outcome of a finished column-generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnGenerationReport {
    /// Master-solve/pricing rounds performed.
    pub rounds: usize,
    /// Columns added across all rounds, after pool filtering.
    pub columns_added: usize,
}

/// Alternates between solving the master and pricing new shifts until
/// the pricer comes back empty or the round limit is hit.
pub struct ColumnGeneration<M, P> {
    master: M,
    pricer: P,
    max_rounds: usize,
}

impl<M: MasterProblem, P: Pricer> ColumnGeneration<M, P> {
    pub fn new(master: M, pricer: P, max_rounds: usize) -> Self {
        ColumnGeneration {
            master,
            pricer,
            max_rounds,
        }
    }

    /// Seed the master with `initial` columns and iterate. An empty
    /// pricing result is the normal stopping condition; hitting the
    /// round limit is logged but not an error.
    pub fn run(
        &mut self,
        instance: &Instance,
        initial: Vec<Shift>,
    ) -> Result<ColumnGenerationReport, MasterError> {
        let mut columns_added = initial.len();
        self.master.add_columns(initial);

        let mut rounds = 0;
        while rounds < self.max_rounds {
            self.master.solve()?;
            if self.master.is_infeasible() {
                return Err(MasterError::Infeasible);
            }
            rounds += 1;

            let duals = self.master.duals();
            let columns = self.pricer.price(instance, &duals);
            if columns.is_empty() {
                info!("column generation converged after {rounds} rounds");
                return Ok(ColumnGenerationReport {
                    rounds,
                    columns_added,
                });
            }

            info!("round {rounds}: adding {} columns", columns.len());
            columns_added += columns.len();
            self.master.add_columns(columns);
        }

        warn!("column generation stopped at round limit {}", self.max_rounds);
        Ok(ColumnGenerationReport {
            rounds,
            columns_added,
        })
    }

    pub fn into_master(self) -> M {
        self.master
    }
}
