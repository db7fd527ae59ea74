//! Causal graph construction for one window of returns
//!
//! Runs the Granger test for every ordered pair of firms and keeps the edge
//! `i -> j` when firm `i`'s lags significantly and strongly predict firm `j`.
//! Degenerate pairs (constant series, singular regressions) yield no edge.

use crate::error::{CausalityError, Result};
use crate::granger::{GrangerConfig, GrangerTest};
use contagion_network::AdjacencyMatrix;
use ndarray::ArrayView2;
use tracing::debug;

/// Builds a directed adjacency matrix from a `T x N` window of returns
#[derive(Debug, Clone, Default)]
pub struct CausalGraphBuilder {
    test: GrangerTest,
}

impl CausalGraphBuilder {
    /// Create a builder with the given test configuration
    pub fn new(config: GrangerConfig) -> Self {
        Self {
            test: GrangerTest::new(config),
        }
    }

    /// Test configuration in use
    pub const fn config(&self) -> &GrangerConfig {
        self.test.config()
    }

    /// Build the causality network of `window` (rows are observations,
    /// columns are firms).
    pub fn build(&self, window: ArrayView2<'_, f64>) -> Result<AdjacencyMatrix> {
        let (n_periods, n_firms) = window.dim();
        let required = self.config().min_observations();
        if n_periods < required {
            return Err(CausalityError::InsufficientData {
                required,
                actual: n_periods,
            });
        }

        let mut adjacency = AdjacencyMatrix::empty(n_firms);
        let mut degenerate = 0usize;

        for cause in 0..n_firms {
            for effect in 0..n_firms {
                if cause == effect {
                    continue;
                }

                match self.test.test(window.column(cause), window.column(effect)) {
                    Ok(outcome) => {
                        adjacency.set(cause, effect, outcome.is_causal(self.config()));
                    }
                    Err(CausalityError::DegenerateInput(reason)) => {
                        degenerate += 1;
                        debug!(cause, effect, %reason, "degenerate pair treated as non-causal");
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        if degenerate > 0 {
            debug!(degenerate, n_firms, "window contained degenerate pairs");
        }

        Ok(adjacency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Three firms where firm 0 drives firm 1 and firm 2 is constant
    fn chain_window(n: usize) -> Array2<f64> {
        let mut rng = StdRng::seed_from_u64(42);
        let mut window = Array2::<f64>::zeros((n, 3));
        for t in 0..n {
            window[[t, 0]] = rng.gen_range(-0.02..0.02);
            let lagged = if t > 0 { window[[t - 1, 0]] } else { 0.0 };
            window[[t, 1]] = 0.9 * lagged + rng.gen_range(-0.002..0.002);
            window[[t, 2]] = 0.001;
        }
        window
    }

    #[test]
    fn test_detects_driver() {
        let builder = CausalGraphBuilder::default();
        let adjacency = builder.build(chain_window(252).view()).unwrap();
        assert!(adjacency.get(0, 1));
    }

    #[test]
    fn test_constant_firm_has_no_edges() {
        let builder = CausalGraphBuilder::new(GrangerConfig {
            robust: true,
            ..Default::default()
        });
        let adjacency = builder.build(chain_window(100).view()).unwrap();
        for other in 0..2 {
            assert!(!adjacency.get(2, other));
            assert!(!adjacency.get(other, 2));
        }
    }

    #[test]
    fn test_diagonal_is_zero() {
        let adjacency = CausalGraphBuilder::default()
            .build(chain_window(80).view())
            .unwrap();
        for i in 0..3 {
            assert!(!adjacency.get(i, i));
        }
    }

    #[test]
    fn test_all_constant_window() {
        let window = Array2::<f64>::from_elem((40, 4), 0.5);
        let adjacency = CausalGraphBuilder::default().build(window.view()).unwrap();
        assert_eq!(adjacency.edge_count(), 0);
    }

    #[test]
    fn test_strength_threshold_filters_edges() {
        let builder = CausalGraphBuilder::new(GrangerConfig {
            strength_threshold: 10.0,
            ..Default::default()
        });
        let adjacency = builder.build(chain_window(252).view()).unwrap();
        assert_eq!(adjacency.edge_count(), 0);
    }

    #[test]
    fn test_short_window_rejected() {
        let window = Array2::<f64>::zeros((3, 2));
        assert!(matches!(
            CausalGraphBuilder::default().build(window.view()),
            Err(CausalityError::InsufficientData { .. })
        ));
    }
}
