//! Node centralities
//!
//! All measures except Katz are computed on the underlying undirected graph
//! (`i ~ j` iff `i -> j` or `j -> i`). Katz centrality counts directed walks
//! ending at each node. Nodes without any neighbour score 0 on every measure,
//! and a network with no edges scores 0 everywhere.
//!
//! Eigenvector and Katz scores are normalized to sum to 1 whenever the
//! network has at least one edge.

use crate::adjacency::AdjacencyMatrix;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Iteration settings for the spectral measures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CentralityConfig {
    /// Maximum power/fixed-point iterations (default: 1000)
    pub max_iterations: usize,

    /// L1 convergence tolerance (default: 1e-12)
    pub tolerance: f64,

    /// Katz attenuation as a fraction of `1 / λ_max` (default: 0.9)
    pub katz_damping: f64,
}

impl Default for CentralityConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-12,
            katz_damping: 0.9,
        }
    }
}

/// The six centrality vectors of a network, aligned to node order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Centralities {
    /// Share of shortest paths between other pairs passing through the node
    pub betweenness: Array1<f64>,
    /// Inverse mean distance to reachable nodes
    pub closeness: Array1<f64>,
    /// Neighbour count over `N - 1`
    pub degree: Array1<f64>,
    /// Dominant eigenvector of the undirected adjacency, summing to 1
    pub eigenvector: Array1<f64>,
    /// Attenuated incoming walk counts, summing to 1
    pub katz: Array1<f64>,
    /// Local clustering coefficient
    pub clustering: Array1<f64>,
}

impl Centralities {
    /// Compute every centrality of `adjacency`
    pub fn compute(adjacency: &AdjacencyMatrix, config: &CentralityConfig) -> Self {
        let neighbors = adjacency.undirected_neighbors();
        let (lambda, eigenvector) = eigenvector_centrality(adjacency, config);

        Self {
            betweenness: betweenness_centrality(&neighbors),
            closeness: closeness_centrality(&neighbors),
            degree: degree_centrality(&neighbors),
            eigenvector,
            katz: katz_centrality(adjacency, lambda, config),
            clustering: clustering_coefficient(&neighbors),
        }
    }
}

/// Brandes' algorithm over the undirected neighbour lists.
///
/// Scores are normalized by `(N - 1)(N - 2)`, so a star centre scores 1.
pub fn betweenness_centrality(neighbors: &[Vec<usize>]) -> Array1<f64> {
    let n = neighbors.len();
    let mut centrality = Array1::<f64>::zeros(n);
    if n <= 2 {
        return centrality;
    }

    for source in 0..n {
        let mut stack = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut paths = vec![0.0_f64; n];
        let mut distance = vec![usize::MAX; n];

        paths[source] = 1.0;
        distance[source] = 0;

        let mut queue = VecDeque::from([source]);
        while let Some(v) = queue.pop_front() {
            stack.push(v);
            for &w in &neighbors[v] {
                if distance[w] == usize::MAX {
                    distance[w] = distance[v] + 1;
                    queue.push_back(w);
                }
                if distance[w] == distance[v] + 1 {
                    paths[w] += paths[v];
                    predecessors[w].push(v);
                }
            }
        }

        // Accumulate dependencies in order of decreasing distance
        let mut dependency = vec![0.0_f64; n];
        while let Some(w) = stack.pop() {
            for &v in &predecessors[w] {
                dependency[v] += paths[v] / paths[w] * (1.0 + dependency[w]);
            }
            if w != source {
                centrality[w] += dependency[w];
            }
        }
    }

    centrality / ((n - 1) * (n - 2)) as f64
}

/// Breadth-first hop distances from `source`; `usize::MAX` marks unreachable nodes
fn shortest_path_distances(neighbors: &[Vec<usize>], source: usize) -> Vec<usize> {
    let mut distance = vec![usize::MAX; neighbors.len()];
    distance[source] = 0;

    let mut queue = VecDeque::from([source]);
    while let Some(current) = queue.pop_front() {
        for &next in &neighbors[current] {
            if distance[next] == usize::MAX {
                distance[next] = distance[current] + 1;
                queue.push_back(next);
            }
        }
    }

    distance
}

/// Reachable count over the total distance to reachable nodes
pub fn closeness_centrality(neighbors: &[Vec<usize>]) -> Array1<f64> {
    Array1::from_iter((0..neighbors.len()).map(|node| {
        let distances = shortest_path_distances(neighbors, node);
        let (reachable, total) = distances
            .iter()
            .filter(|&&d| d != 0 && d != usize::MAX)
            .fold((0usize, 0usize), |(count, sum), &d| (count + 1, sum + d));

        if total > 0 {
            reachable as f64 / total as f64
        } else {
            0.0
        }
    }))
}

/// Neighbour count over `N - 1`
pub fn degree_centrality(neighbors: &[Vec<usize>]) -> Array1<f64> {
    let n = neighbors.len();
    if n <= 1 {
        return Array1::zeros(n);
    }

    let max_degree = (n - 1) as f64;
    Array1::from_iter(neighbors.iter().map(|adj| adj.len() as f64 / max_degree))
}

/// Fraction of neighbour pairs that are themselves linked
pub fn clustering_coefficient(neighbors: &[Vec<usize>]) -> Array1<f64> {
    Array1::from_iter(neighbors.iter().map(|adj| {
        let k = adj.len();
        if k < 2 {
            return 0.0;
        }

        let mut closed = 0usize;
        for (idx, &a) in adj.iter().enumerate() {
            for &b in &adj[idx + 1..] {
                if neighbors[a].binary_search(&b).is_ok() {
                    closed += 1;
                }
            }
        }

        closed as f64 / (k * (k - 1) / 2) as f64
    }))
}

/// Dominant eigenpair of the undirected adjacency by power iteration.
///
/// Iterates on `S + I`, which shares eigenvectors with `S` but has a unique
/// dominant eigenvalue even for bipartite graphs. Returns `λ_max(S)` and the
/// eigenvector normalized to sum to 1; both are zero without edges.
pub fn eigenvector_centrality(
    adjacency: &AdjacencyMatrix,
    config: &CentralityConfig,
) -> (f64, Array1<f64>) {
    let n = adjacency.len();
    if adjacency.edge_count() == 0 {
        return (0.0, Array1::zeros(n));
    }

    let sym = adjacency.symmetrized().mapv(f64::from);
    let mut vector = Array1::from_elem(n, 1.0 / (n as f64).sqrt());

    for _ in 0..config.max_iterations {
        let mut next = sym.dot(&vector) + &vector;
        let norm = next.dot(&next).sqrt();
        if norm == 0.0 {
            break;
        }
        next /= norm;

        let diff: f64 = (&next - &vector).mapv(f64::abs).sum();
        vector = next;

        if diff < config.tolerance {
            break;
        }
    }

    let lambda = rayleigh_quotient(&sym, &vector);

    // Isolated nodes only decay geometrically under the shift
    for (node, value) in vector.iter_mut().enumerate() {
        if sym.row(node).sum() == 0.0 {
            *value = 0.0;
        }
    }

    (lambda, normalize_sum(vector.mapv(f64::abs)))
}

fn rayleigh_quotient(matrix: &Array2<f64>, vector: &Array1<f64>) -> f64 {
    let denom = vector.dot(vector);
    if denom == 0.0 {
        0.0
    } else {
        vector.dot(&matrix.dot(vector)) / denom
    }
}

/// Katz centrality `Σ_k α^k (1ᵀ A^k)` with `α = damping / λ_max`.
///
/// `lambda_max` is the dominant eigenvalue of the symmetrized adjacency, which
/// bounds the spectral radius of the directed one, so the series converges.
pub fn katz_centrality(
    adjacency: &AdjacencyMatrix,
    lambda_max: f64,
    config: &CentralityConfig,
) -> Array1<f64> {
    let n = adjacency.len();
    if adjacency.edge_count() == 0 || lambda_max <= 0.0 {
        return Array1::zeros(n);
    }

    let alpha = config.katz_damping / lambda_max;
    let incoming = adjacency.to_f64().reversed_axes();
    let mut scores = Array1::<f64>::zeros(n);

    for _ in 0..config.max_iterations {
        let next = incoming.dot(&(&scores + 1.0)) * alpha;
        let diff: f64 = (&next - &scores).mapv(f64::abs).sum();
        scores = next;

        if diff < config.tolerance {
            break;
        }
    }

    normalize_sum(scores)
}

fn normalize_sum(values: Array1<f64>) -> Array1<f64> {
    let total = values.sum();
    if total > 0.0 && total.is_finite() {
        values / total
    } else {
        Array1::zeros(values.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn star(n: usize) -> AdjacencyMatrix {
        let mut adjacency = AdjacencyMatrix::empty(n);
        for leaf in 1..n {
            adjacency.set(0, leaf, true);
        }
        adjacency
    }

    fn path(n: usize) -> AdjacencyMatrix {
        let mut adjacency = AdjacencyMatrix::empty(n);
        for i in 0..n - 1 {
            adjacency.set(i, i + 1, true);
        }
        adjacency
    }

    #[test]
    fn test_star_betweenness() {
        let centrality = betweenness_centrality(&star(5).undirected_neighbors());
        assert_relative_eq!(centrality[0], 1.0);
        for leaf in 1..5 {
            assert_relative_eq!(centrality[leaf], 0.0);
        }
    }

    #[test]
    fn test_path_betweenness() {
        // 0 - 1 - 2: the middle node lies on the only 0..2 path
        let centrality = betweenness_centrality(&path(3).undirected_neighbors());
        assert_relative_eq!(centrality[1], 1.0);
        assert_relative_eq!(centrality[0], 0.0);
    }

    #[test]
    fn test_closeness_excludes_unreachable() {
        // 0 - 1 - 2 plus isolated 3
        let mut adjacency = AdjacencyMatrix::empty(4);
        adjacency.set(0, 1, true);
        adjacency.set(2, 1, true);

        let closeness = closeness_centrality(&adjacency.undirected_neighbors());
        assert_relative_eq!(closeness[0], 2.0 / 3.0);
        assert_relative_eq!(closeness[1], 1.0);
        assert_relative_eq!(closeness[3], 0.0);
    }

    #[test]
    fn test_degree_centrality_star() {
        let degree = degree_centrality(&star(5).undirected_neighbors());
        assert_relative_eq!(degree[0], 1.0);
        assert_relative_eq!(degree[1], 0.25);
    }

    #[test]
    fn test_clustering_triangle() {
        let mut adjacency = AdjacencyMatrix::empty(4);
        adjacency.set(0, 1, true);
        adjacency.set(1, 2, true);
        adjacency.set(2, 0, true);
        adjacency.set(0, 3, true);

        let clustering = clustering_coefficient(&adjacency.undirected_neighbors());
        // Node 0 has neighbours {1, 2, 3} and only 1 ~ 2 closes a triangle
        assert_relative_eq!(clustering[0], 1.0 / 3.0);
        assert_relative_eq!(clustering[1], 1.0);
        assert_relative_eq!(clustering[3], 0.0);
    }

    #[test]
    fn test_eigenvector_complete_is_uniform() {
        let (lambda, eigenvector) =
            eigenvector_centrality(&AdjacencyMatrix::complete(4), &CentralityConfig::default());
        assert_relative_eq!(lambda, 3.0, epsilon = 1e-9);
        for value in &eigenvector {
            assert_relative_eq!(*value, 0.25, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_eigenvector_bipartite_converges() {
        // A star is bipartite; plain power iteration would oscillate
        let (lambda, eigenvector) =
            eigenvector_centrality(&star(5), &CentralityConfig::default());
        assert_relative_eq!(lambda, 2.0, epsilon = 1e-9);
        assert_relative_eq!(eigenvector.sum(), 1.0, epsilon = 1e-12);
        assert!(eigenvector[0] > eigenvector[1]);
        assert_relative_eq!(eigenvector[1], eigenvector[4], epsilon = 1e-9);
    }

    #[test]
    fn test_eigenvector_isolated_node_is_zero() {
        let mut adjacency = AdjacencyMatrix::empty(4);
        adjacency.set(0, 1, true);
        adjacency.set(1, 2, true);
        let (_, eigenvector) = eigenvector_centrality(&adjacency, &CentralityConfig::default());
        assert_eq!(eigenvector[3], 0.0);
        assert_relative_eq!(eigenvector.sum(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_katz_sums_to_one() {
        let adjacency = path(4);
        let (lambda, _) = eigenvector_centrality(&adjacency, &CentralityConfig::default());
        let katz = katz_centrality(&adjacency, lambda, &CentralityConfig::default());
        assert_relative_eq!(katz.sum(), 1.0, epsilon = 1e-12);
        // The source of the chain receives no walks
        assert_eq!(katz[0], 0.0);
        // Later nodes accumulate longer incoming walks
        assert!(katz[3] > katz[1]);
    }

    #[test]
    fn test_empty_network_scores_zero() {
        let centralities =
            Centralities::compute(&AdjacencyMatrix::empty(3), &CentralityConfig::default());
        for vector in [
            &centralities.betweenness,
            &centralities.closeness,
            &centralities.degree,
            &centralities.eigenvector,
            &centralities.katz,
            &centralities.clustering,
        ] {
            assert!(vector.iter().all(|&v| v == 0.0));
        }
    }
}
