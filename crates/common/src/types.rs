use super::error::Error;

/// Integer weight carried by every edge and matrix cell.
pub type Cost = i64;

/// Type alias for a single directed edge: (from, to, weight)
pub type DirectedEdge = (usize, usize, Cost);

/// An outgoing edge stored under its source vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub to: usize,
    pub weight: Cost,
}

impl Edge {
    pub fn new(to: usize, weight: Cost) -> Self {
        Edge { to, weight }
    }
}

/// Represents a negative-weight cycle found in a directed cost graph.
///
/// Fields:
/// - `vertices`: closed walk `v0 -> v1 -> ... -> v0`; the first and last entries are equal.
/// - `weight`: sum of the edge weights along the walk (strictly negative for a real find).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegativeCycle {
    pub vertices: Vec<usize>,
    pub weight: Cost,
}

impl NegativeCycle {
    /// Consecutive `(tail, head)` pairs, one per edge of the cycle.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.vertices.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Number of edges in the cycle.
    pub fn len(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Square cost matrix stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostMatrix {
    size: usize,
    cells: Vec<Cost>,
}

impl CostMatrix {
    /// Builds an `size x size` matrix from row-major cells.
    ///
    /// # Errors
    /// Returns `Error::InvalidMatrix` if `cells.len() != size * size`.
    pub fn new(size: usize, cells: Vec<Cost>) -> Result<Self, Error> {
        let expected = size.checked_mul(size).ok_or(Error::CostOverflow)?;
        if cells.len() != expected {
            return Err(Error::InvalidMatrix {
                expected,
                actual: cells.len(),
            });
        }
        Ok(CostMatrix { size, cells })
    }

    /// Builds a matrix from nested rows; every row must have `rows.len()` entries.
    ///
    /// # Errors
    /// Returns `Error::InvalidMatrix` for the first row of the wrong length.
    pub fn from_rows(rows: Vec<Vec<Cost>>) -> Result<Self, Error> {
        let size = rows.len();
        if let Some(row) = rows.iter().find(|row| row.len() != size) {
            return Err(Error::InvalidMatrix {
                expected: size,
                actual: row.len(),
            });
        }
        let cells: Vec<Cost> = rows.into_iter().flatten().collect();
        Self::new(size, cells)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> Cost {
        self.cells[row * self.size + col]
    }

    pub fn cells(&self) -> &[Cost] {
        &self.cells
    }

    pub fn max_cost(&self) -> Option<Cost> {
        self.cells.iter().copied().max()
    }

    pub fn min_cost(&self) -> Option<Cost> {
        self.cells.iter().copied().min()
    }

    /// Returns a matrix with `f` applied to every cell, failing on the first `None`.
    pub fn try_map<F>(&self, f: F) -> Result<Self, Error>
    where
        F: Fn(Cost) -> Option<Cost>,
    {
        let cells = self
            .cells
            .iter()
            .map(|&c| f(c).ok_or(Error::CostOverflow))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CostMatrix {
            size: self.size,
            cells,
        })
    }
}
