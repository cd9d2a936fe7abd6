pub mod assignment;
pub mod cancel;
pub mod graph;
pub mod solver;
pub mod traits;

pub use assignment::{AssignmentSolver, Objective, build_cycle_graph, solve_assignment};
pub use cancel::{CycleCancellingSolver, SolverOptions};
pub use graph::Graph;
pub use solver::{QueueDiscipline, SpfaDetector};
pub use traits::NegativeCycleFinder;
