//! Aggregated result of a connectedness run
//!
//! Created empty once the window count is known and filled exclusively by
//! [`crate::aggregate::Aggregator`]. Every matrix and vector follows the firm
//! order of the input panel.

use crate::config::ConnectednessConfig;
use contagion_network::{
    AdjacencyMatrix, ConnectednessIndicators, GroupDelimiters, Measure, NetworkMetrics,
};
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// Column of the indicator matrix holding DCI
pub const DCI_COLUMN: usize = 0;
/// Column of the indicator matrix holding CIO
pub const CIO_COLUMN: usize = 1;
/// Column of the indicator matrix holding CIOO
pub const CIOO_COLUMN: usize = 2;

/// Time series and average network of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectednessDataset {
    pub(crate) firms: Vec<String>,
    pub(crate) groups: GroupDelimiters,
    pub(crate) config: ConnectednessConfig,
    /// One network per window
    pub(crate) adjacency: Vec<AdjacencyMatrix>,
    /// `T x 3`: DCI, CIO, CIOO
    pub(crate) indicators: Array2<f64>,
    /// `T x N` per measure, indexed by [`Measure::index`]
    pub(crate) series: Vec<Array2<f64>>,
    /// Element-wise mean of the window networks
    pub(crate) average_values: Array2<f64>,
    pub(crate) average_threshold: f64,
    pub(crate) average_adjacency: AdjacencyMatrix,
    pub(crate) average_metrics: NetworkMetrics,
}

impl ConnectednessDataset {
    /// Empty dataset sized for `n_windows` windows
    pub fn new(
        firms: Vec<String>,
        groups: GroupDelimiters,
        config: ConnectednessConfig,
        n_windows: usize,
    ) -> Self {
        let n_firms = firms.len();
        let average_adjacency = AdjacencyMatrix::empty(n_firms);
        let average_metrics = NetworkMetrics::compute(&average_adjacency, &groups);

        Self {
            firms,
            groups,
            config,
            adjacency: Vec::with_capacity(n_windows),
            indicators: Array2::zeros((n_windows, 3)),
            series: (0..Measure::COUNT)
                .map(|_| Array2::zeros((n_windows, n_firms)))
                .collect(),
            average_values: Array2::zeros((n_firms, n_firms)),
            average_threshold: 0.0,
            average_adjacency,
            average_metrics,
        }
    }

    /// Firm names
    pub fn firms(&self) -> &[String] {
        &self.firms
    }

    /// Group delimiters used for CIOO
    pub const fn groups(&self) -> &GroupDelimiters {
        &self.groups
    }

    /// Configuration of the run
    pub const fn config(&self) -> &ConnectednessConfig {
        &self.config
    }

    /// Number of windows T
    pub fn n_windows(&self) -> usize {
        self.indicators.nrows()
    }

    /// Number of firms N
    pub fn n_firms(&self) -> usize {
        self.firms.len()
    }

    /// Window networks in window order
    pub fn adjacency(&self) -> &[AdjacencyMatrix] {
        &self.adjacency
    }

    /// `T x 3` indicator matrix (DCI, CIO, CIOO)
    pub const fn indicators(&self) -> &Array2<f64> {
        &self.indicators
    }

    /// Indicators of window `index`
    pub fn indicators_at(&self, index: usize) -> Option<ConnectednessIndicators> {
        (index < self.n_windows()).then(|| ConnectednessIndicators {
            dci: self.indicators[[index, DCI_COLUMN]],
            cio: self.indicators[[index, CIO_COLUMN]],
            cioo: self.indicators[[index, CIOO_COLUMN]],
        })
    }

    /// DCI over time
    pub fn dci(&self) -> ArrayView1<'_, f64> {
        self.indicators.column(DCI_COLUMN)
    }

    /// CIO over time
    pub fn cio(&self) -> ArrayView1<'_, f64> {
        self.indicators.column(CIO_COLUMN)
    }

    /// CIOO over time
    pub fn cioo(&self) -> ArrayView1<'_, f64> {
        self.indicators.column(CIOO_COLUMN)
    }

    /// `T x N` series of one measure
    pub fn series(&self, measure: Measure) -> &Array2<f64> {
        &self.series[measure.index()]
    }

    /// Mean of the window networks before thresholding
    pub const fn average_values(&self) -> &Array2<f64> {
        &self.average_values
    }

    /// Grand mean used to binarize the average network
    pub const fn average_threshold(&self) -> f64 {
        self.average_threshold
    }

    /// Binarized average network
    pub const fn average_adjacency(&self) -> &AdjacencyMatrix {
        &self.average_adjacency
    }

    /// Metrics of the average network
    pub const fn average_metrics(&self) -> &NetworkMetrics {
        &self.average_metrics
    }

    /// Average-network vector of one measure
    pub const fn average(&self, measure: Measure) -> &Array1<f64> {
        self.average_metrics.vector(measure)
    }
}
