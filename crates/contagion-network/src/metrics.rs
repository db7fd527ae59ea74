//! Full metric set of one network
//!
//! Bundles the connectedness indicators, the three degree vectors and the six
//! centralities computed from a single adjacency matrix.

use crate::adjacency::AdjacencyMatrix;
use crate::centrality::{Centralities, CentralityConfig};
use crate::groups::GroupDelimiters;
use crate::indicators::ConnectednessIndicators;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-node series produced for every network
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    /// Edges entering the node
    InDegree,
    /// Edges leaving the node
    OutDegree,
    /// Undirected neighbour count, not `in + out`: a mutual pair of links
    /// counts once. Equals degree centrality times `N - 1`.
    Degree,
    /// Betweenness centrality
    Betweenness,
    /// Closeness centrality
    Closeness,
    /// Degree centrality
    DegreeCentrality,
    /// Eigenvector centrality
    Eigenvector,
    /// Katz centrality
    Katz,
    /// Clustering coefficient
    Clustering,
}

impl Measure {
    /// Number of measures
    pub const COUNT: usize = 9;

    /// Every measure, in storage order
    pub const ALL: [Self; Self::COUNT] = [
        Self::InDegree,
        Self::OutDegree,
        Self::Degree,
        Self::Betweenness,
        Self::Closeness,
        Self::DegreeCentrality,
        Self::Eigenvector,
        Self::Katz,
        Self::Clustering,
    ];

    /// Position in [`Self::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Snake-case identifier, used for file names and column headers
    pub const fn name(self) -> &'static str {
        match self {
            Self::InDegree => "in_degree",
            Self::OutDegree => "out_degree",
            Self::Degree => "degree",
            Self::Betweenness => "betweenness",
            Self::Closeness => "closeness",
            Self::DegreeCentrality => "degree_centrality",
            Self::Eigenvector => "eigenvector",
            Self::Katz => "katz",
            Self::Clustering => "clustering",
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Indicators, degrees and centralities of one network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkMetrics {
    /// DCI, CIO and CIOO
    pub indicators: ConnectednessIndicators,
    /// Column sums
    pub in_degree: Array1<f64>,
    /// Row sums
    pub out_degree: Array1<f64>,
    /// Neighbour count in the underlying undirected graph; a mutual pair
    /// counts once, so this is not `in_degree + out_degree`
    pub degree: Array1<f64>,
    /// Centrality vectors
    pub centralities: Centralities,
}

impl NetworkMetrics {
    /// Compute every metric with default iteration settings
    pub fn compute(adjacency: &AdjacencyMatrix, groups: &GroupDelimiters) -> Self {
        Self::compute_with(adjacency, groups, &CentralityConfig::default())
    }

    /// Compute every metric with explicit iteration settings
    pub fn compute_with(
        adjacency: &AdjacencyMatrix,
        groups: &GroupDelimiters,
        config: &CentralityConfig,
    ) -> Self {
        let degree = Array1::from_iter(
            adjacency
                .undirected_neighbors()
                .iter()
                .map(|adj| adj.len() as f64),
        );

        Self {
            indicators: ConnectednessIndicators::compute(adjacency, groups),
            in_degree: adjacency.in_degree(),
            out_degree: adjacency.out_degree(),
            degree,
            centralities: Centralities::compute(adjacency, config),
        }
    }

    /// Vector of a single measure
    pub const fn vector(&self, measure: Measure) -> &Array1<f64> {
        match measure {
            Measure::InDegree => &self.in_degree,
            Measure::OutDegree => &self.out_degree,
            Measure::Degree => &self.degree,
            Measure::Betweenness => &self.centralities.betweenness,
            Measure::Closeness => &self.centralities.closeness,
            Measure::DegreeCentrality => &self.centralities.degree,
            Measure::Eigenvector => &self.centralities.eigenvector,
            Measure::Katz => &self.centralities.katz,
            Measure::Clustering => &self.centralities.clustering,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_degree_centrality_matches_degree() {
        let mut adjacency = AdjacencyMatrix::empty(5);
        adjacency.set(0, 1, true);
        adjacency.set(1, 0, true);
        adjacency.set(2, 3, true);
        adjacency.set(4, 3, true);

        let metrics = NetworkMetrics::compute(&adjacency, &GroupDelimiters::none());
        for node in 0..5 {
            assert_relative_eq!(
                metrics.centralities.degree[node],
                metrics.degree[node] / 4.0
            );
        }
        // Mutual links count once in the undirected degree
        assert_relative_eq!(metrics.degree[0], 1.0);
        assert_relative_eq!(metrics.in_degree[0] + metrics.out_degree[0], 2.0);
    }

    #[test]
    fn test_complete_network() {
        let metrics =
            NetworkMetrics::compute(&AdjacencyMatrix::complete(6), &GroupDelimiters::none());
        assert_relative_eq!(metrics.indicators.dci, 1.0);
        for node in 0..6 {
            assert_relative_eq!(metrics.centralities.degree[node], 1.0);
            assert_relative_eq!(metrics.centralities.closeness[node], 1.0);
            assert_relative_eq!(metrics.centralities.clustering[node], 1.0);
            assert_relative_eq!(metrics.centralities.betweenness[node], 0.0);
            assert_relative_eq!(metrics.in_degree[node], 5.0);
            assert_relative_eq!(metrics.out_degree[node], 5.0);
        }
        assert_relative_eq!(metrics.centralities.katz.sum(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_measure_order_matches_index() {
        for (position, measure) in Measure::ALL.iter().enumerate() {
            assert_eq!(measure.index(), position);
        }
        assert_eq!(Measure::DegreeCentrality.to_string(), "degree_centrality");
    }

    #[test]
    fn test_vector_lookup() {
        let mut adjacency = AdjacencyMatrix::empty(3);
        adjacency.set(0, 1, true);
        let metrics = NetworkMetrics::compute(&adjacency, &GroupDelimiters::none());
        assert_eq!(metrics.vector(Measure::OutDegree)[0], 1.0);
        assert_eq!(metrics.vector(Measure::InDegree)[1], 1.0);
        assert_eq!(metrics.vector(Measure::Clustering), &metrics.centralities.clustering);
    }
}
