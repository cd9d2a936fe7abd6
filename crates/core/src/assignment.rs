use super::cancel::{CycleCancellingSolver, SolverOptions};
use common::{
    error::Error,
    types::{Cost, CostMatrix},
};
use log::debug;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Objective {
    #[default]
    Minimize,
    Maximize,
}

impl FromStr for Objective {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minimize" | "min" => Ok(Objective::Minimize),
            "maximize" | "max" => Ok(Objective::Maximize),
            other => Err(format!(
                "unknown objective '{}', expected 'minimize' or 'maximize'",
                other
            )),
        }
    }
}

/// Builds the cycle-cancelling graph for an `N x N` matrix.
///
/// Vertices `0..N` are rows and `N..2N` are columns. For cell `(r, c)` with
/// value `w`:
/// - `r == c` → edge `c + N -> r` with weight `w` (the starting assignment)
/// - `r != c` → edge `r -> c + N` with weight `-w`
///
/// Cancelled to optimality, the positive edges left are the chosen
/// column-to-row arcs of a maximum-weight assignment of a non-negative matrix.
pub fn build_cycle_graph(
    matrix: &CostMatrix,
    options: SolverOptions,
) -> Result<CycleCancellingSolver, Error> {
    let n = matrix.size();
    let mut solver = CycleCancellingSolver::with_options(2 * n, options);

    for r in 0..n {
        for c in 0..n {
            let w = matrix.get(r, c);
            if r == c {
                solver.add_edge(c + n, r, w)?;
            } else {
                let neg = w.checked_neg().ok_or(Error::CostOverflow)?;
                solver.add_edge(r, c + n, neg)?;
            }
        }
    }

    Ok(solver)
}

/// Optimal assignment of an arbitrary integer matrix under either objective.
///
/// The matrix is shifted so every cell is non-negative and larger cells are
/// better, then handed to [`build_cycle_graph`]:
/// - minimize: `a' = K - a` with `K = max(a)`, cost `= N*K - raw`
/// - maximize: `a' = a - m` with `m = min(0, min(a))`, cost `= raw + N*m`
pub struct AssignmentSolver {
    solver: CycleCancellingSolver,
    size: usize,
    objective: Objective,
    offset: Cost,
}

impl AssignmentSolver {
    pub fn new(
        matrix: &CostMatrix,
        objective: Objective,
        options: SolverOptions,
    ) -> Result<Self, Error> {
        let (shifted, offset) = match objective {
            Objective::Minimize => {
                let k = matrix.max_cost().unwrap_or(0);
                (matrix.try_map(|a| k.checked_sub(a))?, k)
            }
            Objective::Maximize => {
                let m = matrix.min_cost().unwrap_or(0).min(0);
                (matrix.try_map(|a| a.checked_sub(m))?, m)
            }
        };

        Ok(AssignmentSolver {
            solver: build_cycle_graph(&shifted, options)?,
            size: matrix.size(),
            objective,
            offset,
        })
    }

    pub fn solver(&self) -> &CycleCancellingSolver {
        &self.solver
    }

    /// Cost of the assignment the graph currently encodes.
    pub fn current_cost(&self) -> Result<Cost, Error> {
        let raw = self.solver.get_cost()?;
        let size = Cost::try_from(self.size).map_err(|_| Error::CostOverflow)?;
        let base = self.offset.checked_mul(size).ok_or(Error::CostOverflow)?;

        match self.objective {
            Objective::Minimize => base.checked_sub(raw),
            Objective::Maximize => raw.checked_add(base),
        }
        .ok_or(Error::CostOverflow)
    }

    /// Cancels one negative cycle; `false` once the assignment is optimal.
    pub fn step(&mut self) -> Result<bool, Error> {
        Ok(self.solver.cancel_next()?.is_some())
    }

    /// Runs cancellation to completion and returns the optimal cost.
    pub fn solve(mut self) -> Result<Cost, Error> {
        let cancellations = self.solver.reduce_cycles()?;
        let cost = self.current_cost()?;
        debug!(
            "{:?} assignment of size {} solved with {} cancellations, cost {}",
            self.objective, self.size, cancellations, cost
        );
        Ok(cost)
    }
}

/// Optimal assignment cost of `matrix` under `objective`.
pub fn solve_assignment(
    matrix: &CostMatrix,
    objective: Objective,
    options: SolverOptions,
) -> Result<Cost, Error> {
    AssignmentSolver::new(matrix, objective, options)?.solve()
}
