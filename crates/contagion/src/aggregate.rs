//! Folding window results into a dataset
//!
//! The average network is the element-wise mean of all window networks,
//! binarized against the grand mean of that mean matrix: entries at or above
//! the threshold are linked. An all-zero mean stays empty.

use crate::dataset::{CIO_COLUMN, CIOO_COLUMN, ConnectednessDataset, DCI_COLUMN};
use crate::error::{EngineError, Result};
use crate::result::WindowResult;
use contagion_network::{
    AdjacencyMatrix, CentralityConfig, Measure, NetworkError, NetworkMetrics,
};
use ndarray::Array2;
use tracing::debug;

/// Writes window results into a [`ConnectednessDataset`]
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    centrality: CentralityConfig,
}

impl Aggregator {
    /// Aggregator using `centrality` for the average network
    pub const fn new(centrality: CentralityConfig) -> Self {
        Self { centrality }
    }

    /// Copy every window into its row and compute the average network
    ///
    /// # Errors
    /// `IncompleteResults` when any window slot is empty or the slot count
    /// differs from the dataset's window count. `Network(DimensionMismatch)`
    /// when a window covers a different number of firms than the dataset.
    /// The dataset is left untouched on error.
    pub fn finalize(
        &self,
        dataset: &mut ConnectednessDataset,
        results: Vec<Option<WindowResult>>,
    ) -> Result<()> {
        let expected = dataset.n_windows();
        let present = results.iter().filter(|r| r.is_some()).count();
        if results.len() != expected || present != expected {
            return Err(EngineError::IncompleteResults {
                missing: expected.abs_diff(present).max(1),
                expected,
            });
        }

        let n_firms = dataset.n_firms();
        for result in results.iter().flatten() {
            let actual = Measure::ALL
                .iter()
                .map(|&measure| result.metrics.vector(measure).len())
                .find(|&len| len != n_firms)
                .unwrap_or_else(|| result.adjacency.len());
            if actual != n_firms {
                return Err(NetworkError::DimensionMismatch {
                    expected: n_firms,
                    actual,
                }
                .into());
            }
        }

        let mut sum = Array2::<f64>::zeros((n_firms, n_firms));
        dataset.adjacency.clear();

        for (row, result) in results.into_iter().flatten().enumerate() {
            let metrics = &result.metrics;
            dataset.indicators[[row, DCI_COLUMN]] = metrics.indicators.dci;
            dataset.indicators[[row, CIO_COLUMN]] = metrics.indicators.cio;
            dataset.indicators[[row, CIOO_COLUMN]] = metrics.indicators.cioo;

            for measure in Measure::ALL {
                dataset.series[measure.index()]
                    .row_mut(row)
                    .assign(metrics.vector(measure));
            }

            sum += &result.adjacency.to_f64();
            dataset.adjacency.push(result.adjacency);
        }

        let average_values = sum / expected as f64;
        let threshold = average_values.mean().unwrap_or(0.0);
        let average_adjacency = AdjacencyMatrix::from_threshold(&average_values, threshold)?;
        let average_metrics =
            NetworkMetrics::compute_with(&average_adjacency, &dataset.groups, &self.centrality);

        debug!(
            windows = expected,
            threshold,
            edges = average_adjacency.edge_count(),
            "average network computed"
        );

        dataset.average_values = average_values;
        dataset.average_threshold = threshold;
        dataset.average_adjacency = average_adjacency;
        dataset.average_metrics = average_metrics;

        Ok(())
    }
}
