use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A vertex index lies outside `[0, vertex_count)`.
    OutOfRange { vertex: usize, vertex_count: usize },

    /// The cancellation loop hit its iteration cap before the graph became cycle-free.
    NoConvergence { cancellations: usize },

    /// The predecessor chain starting at `vertex` did not close into a negative cycle.
    MalformedCycle { vertex: usize },

    /// A cycle handed to cancellation has no edges.
    EmptyCycle,

    /// A cost matrix, or one of its rows, has the wrong number of entries.
    InvalidMatrix { expected: usize, actual: usize },

    /// Shifting or summing costs overflowed `i64`.
    CostOverflow,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::OutOfRange {
                vertex,
                vertex_count,
            } => write!(
                f,
                "Vertex {} is out of range for a graph with {} vertices.",
                vertex, vertex_count
            ),

            Error::NoConvergence { cancellations } => write!(
                f,
                "Cycle cancellation did not converge after {} cancellations.",
                cancellations
            ),

            Error::MalformedCycle { vertex } => write!(
                f,
                "Predecessor chain from vertex {} does not form a negative cycle.",
                vertex
            ),

            Error::EmptyCycle => write!(f, "Cannot cancel a cycle with no edges."),

            Error::InvalidMatrix { expected, actual } => write!(
                f,
                "Cost matrix expected {} entries but {} were given.",
                expected, actual
            ),

            Error::CostOverflow => write!(f, "Cost arithmetic overflowed."),
        }
    }
}

impl std::error::Error for Error {}
