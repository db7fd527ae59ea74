//! Per-window output

use crate::window::Window;
use contagion_causality::{CausalGraphBuilder, Result};
use contagion_network::{AdjacencyMatrix, CentralityConfig, GroupDelimiters, NetworkMetrics};
use serde::{Deserialize, Serialize};

/// Causality network and metrics of one window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowResult {
    /// Window position, starting at 0
    pub window: usize,
    /// Directed causality network
    pub adjacency: AdjacencyMatrix,
    /// Indicators, degree vectors and centralities
    pub metrics: NetworkMetrics,
}

impl WindowResult {
    /// Build the network of `window` and measure it
    pub fn compute(
        window: &Window<'_>,
        builder: &CausalGraphBuilder,
        groups: &GroupDelimiters,
        centrality: &CentralityConfig,
    ) -> Result<Self> {
        let adjacency = builder.build(window.data)?;
        Ok(Self::from_adjacency(window.index, adjacency, groups, centrality))
    }

    /// Measure an already built network
    pub fn from_adjacency(
        window: usize,
        adjacency: AdjacencyMatrix,
        groups: &GroupDelimiters,
        centrality: &CentralityConfig,
    ) -> Self {
        let metrics = NetworkMetrics::compute_with(&adjacency, groups, centrality);
        Self {
            window,
            adjacency,
            metrics,
        }
    }
}
