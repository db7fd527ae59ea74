//! Directed binary adjacency matrices
//!
//! Entry `(i, j) = 1` records that firm `i` causally leads firm `j`. The
//! diagonal is always zero; the matrix is not symmetric in general.

use crate::error::{NetworkError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Square `{0, 1}` matrix with a zero diagonal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacencyMatrix {
    entries: Array2<u8>,
}

impl AdjacencyMatrix {
    /// Create a network of `n` nodes with no edges
    pub fn empty(n: usize) -> Self {
        Self {
            entries: Array2::zeros((n, n)),
        }
    }

    /// Create a network of `n` nodes where every ordered pair `i != j` is linked
    pub fn complete(n: usize) -> Self {
        let mut entries = Array2::ones((n, n));
        entries.diag_mut().fill(0);
        Self { entries }
    }

    /// Wrap an existing matrix, rejecting non-square, non-binary or
    /// self-linked inputs.
    pub fn from_array(entries: Array2<u8>) -> Result<Self> {
        let (rows, cols) = entries.dim();
        if rows != cols {
            return Err(NetworkError::DimensionMismatch {
                expected: rows,
                actual: cols,
            });
        }

        for ((row, col), &value) in entries.indexed_iter() {
            if value > 1 {
                return Err(NetworkError::NonBinaryEntry { row, col });
            }
            if row == col && value != 0 {
                return Err(NetworkError::NonZeroDiagonal { index: row });
            }
        }

        Ok(Self { entries })
    }

    /// Binarize a real-valued matrix: entries `>= threshold` and strictly
    /// positive become edges, the diagonal is cleared.
    pub fn from_threshold(values: &Array2<f64>, threshold: f64) -> Result<Self> {
        let (rows, cols) = values.dim();
        if rows != cols {
            return Err(NetworkError::DimensionMismatch {
                expected: rows,
                actual: cols,
            });
        }

        let mut entries = values.mapv(|value| u8::from(value > 0.0 && value >= threshold));
        entries.diag_mut().fill(0);
        Ok(Self { entries })
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.entries.nrows()
    }

    /// Whether the network has no nodes
    pub fn is_empty(&self) -> bool {
        self.entries.nrows() == 0
    }

    /// Whether `i` leads `j`
    pub fn get(&self, i: usize, j: usize) -> bool {
        self.entries[[i, j]] != 0
    }

    /// Set or clear the edge `i -> j`. Self loops are ignored.
    pub fn set(&mut self, i: usize, j: usize, linked: bool) {
        if i != j {
            self.entries[[i, j]] = u8::from(linked);
        }
    }

    /// Borrow the underlying `{0, 1}` matrix
    pub const fn as_array(&self) -> &Array2<u8> {
        &self.entries
    }

    /// Copy into a real-valued matrix, used for averaging
    pub fn to_f64(&self) -> Array2<f64> {
        self.entries.mapv(f64::from)
    }

    /// Total number of directed edges
    pub fn edge_count(&self) -> usize {
        self.entries.iter().map(|&v| usize::from(v)).sum()
    }

    /// Row sums: edges leaving each node
    pub fn out_degree(&self) -> Array1<f64> {
        self.entries.map_axis(Axis(1), |row| row.iter().map(|&v| f64::from(v)).sum())
    }

    /// Column sums: edges entering each node
    pub fn in_degree(&self) -> Array1<f64> {
        self.entries.map_axis(Axis(0), |col| col.iter().map(|&v| f64::from(v)).sum())
    }

    /// Underlying undirected structure: `i ~ j` iff `i -> j` or `j -> i`
    pub fn symmetrized(&self) -> Array2<u8> {
        let transposed = self.entries.t();
        let mut sym = self.entries.clone();
        sym.zip_mut_with(&transposed, |a, &b| *a = (*a).max(b));
        sym
    }

    /// Undirected neighbour lists of [`Self::symmetrized`]
    pub fn undirected_neighbors(&self) -> Vec<Vec<usize>> {
        let sym = self.symmetrized();
        sym.outer_iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter_map(|(j, &v)| (v != 0).then_some(j))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_complete_has_zero_diagonal() {
        let adjacency = AdjacencyMatrix::complete(4);
        assert_eq!(adjacency.edge_count(), 12);
        for i in 0..4 {
            assert!(!adjacency.get(i, i));
        }
    }

    #[test]
    fn test_set_ignores_self_loops() {
        let mut adjacency = AdjacencyMatrix::empty(3);
        adjacency.set(1, 1, true);
        adjacency.set(0, 2, true);
        assert_eq!(adjacency.edge_count(), 1);
        assert!(adjacency.get(0, 2));
        assert!(!adjacency.get(2, 0));
    }

    #[test]
    fn test_from_array_rejects_diagonal() {
        let entries = array![[1u8, 0], [0, 0]];
        assert_eq!(
            AdjacencyMatrix::from_array(entries),
            Err(NetworkError::NonZeroDiagonal { index: 0 })
        );
    }

    #[test]
    fn test_from_array_rejects_non_binary() {
        let entries = array![[0u8, 2], [0, 0]];
        assert_eq!(
            AdjacencyMatrix::from_array(entries),
            Err(NetworkError::NonBinaryEntry { row: 0, col: 1 })
        );
    }

    #[test]
    fn test_from_array_rejects_non_square() {
        let entries = Array2::<u8>::zeros((2, 3));
        assert!(AdjacencyMatrix::from_array(entries).is_err());
    }

    #[test]
    fn test_degrees() {
        #[rustfmt::skip]
        let entries = array![
            [0u8, 1, 1],
            [0, 0, 1],
            [0, 0, 0],
        ];
        let adjacency = AdjacencyMatrix::from_array(entries).unwrap();
        assert_eq!(adjacency.out_degree(), array![2.0, 1.0, 0.0]);
        assert_eq!(adjacency.in_degree(), array![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_symmetrized() {
        let mut adjacency = AdjacencyMatrix::empty(3);
        adjacency.set(0, 1, true);
        adjacency.set(1, 0, true);
        adjacency.set(2, 1, true);
        let sym = adjacency.symmetrized();
        assert_eq!(sym, array![[0u8, 1, 0], [1, 0, 1], [0, 1, 0]]);
        assert_eq!(adjacency.undirected_neighbors()[1], vec![0, 2]);
    }

    #[test]
    fn test_from_threshold_inclusive() {
        #[rustfmt::skip]
        let values = array![
            [0.5, 0.25, 0.5],
            [0.1, 0.0, 0.3],
            [0.0, 0.25, 0.0],
        ];
        let adjacency = AdjacencyMatrix::from_threshold(&values, 0.25).unwrap();
        assert!(!adjacency.get(0, 0));
        assert!(adjacency.get(0, 1));
        assert!(adjacency.get(0, 2));
        assert!(!adjacency.get(1, 0));
        assert!(adjacency.get(1, 2));
        assert!(adjacency.get(2, 1));
    }

    #[test]
    fn test_from_threshold_zero_matrix_stays_empty() {
        let values = Array2::<f64>::zeros((3, 3));
        let adjacency = AdjacencyMatrix::from_threshold(&values, 0.0).unwrap();
        assert_eq!(adjacency.edge_count(), 0);
    }
}
