//! Connectedness indicators
//!
//! Scalar summaries of a directed causality network, following Billio,
//! Getmansky, Lo and Pelizzon (2012):
//!
//! ```text
//! DCI  = Σ_ij A_ij / (N (N - 1))
//! CIO  = 1/N Σ_i (in_i + out_i) / (2 (N - 1))
//! CIOO = 1/N Σ_i (in_i^other + out_i^other) / (2 (N - N_g(i)))
//! ```
//!
//! where `N_g(i)` is the size of the group firm `i` belongs to and the
//! `other` counts only edges whose endpoints lie in different groups.
//!
//! # References
//! - Billio, M., Getmansky, M., Lo, A. W., & Pelizzon, L. (2012). "Econometric
//!   Measures of Connectedness and Systemic Risk in the Finance and Insurance
//!   Sectors." Journal of Financial Economics, 104(3), 535-559.

use crate::adjacency::AdjacencyMatrix;
use crate::groups::GroupDelimiters;
use serde::{Deserialize, Serialize};

/// DCI, CIO and CIOO of one network
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectednessIndicators {
    /// Dynamic Causality Index: network density
    pub dci: f64,
    /// Number of connections in and out, as a fraction of the possible ones
    pub cio: f64,
    /// Connections in and out towards other groups, 0 without groups
    pub cioo: f64,
}

impl ConnectednessIndicators {
    /// Compute the indicators of `adjacency`
    pub fn compute(adjacency: &AdjacencyMatrix, groups: &GroupDelimiters) -> Self {
        let n = adjacency.len();
        if n < 2 {
            return Self::default();
        }

        let edges = adjacency.edge_count() as f64;
        let dci = edges / (n * (n - 1)) as f64;

        let in_degree = adjacency.in_degree();
        let out_degree = adjacency.out_degree();
        let cio = in_degree
            .iter()
            .zip(out_degree.iter())
            .map(|(i, o)| (i + o) / (2.0 * (n - 1) as f64))
            .sum::<f64>()
            / n as f64;

        let cioo = if groups.is_empty() {
            0.0
        } else {
            Self::cross_group(adjacency, groups)
        };

        Self { dci, cio, cioo }
    }

    /// Indicators as `[dci, cio, cioo]`
    pub const fn to_array(&self) -> [f64; 3] {
        [self.dci, self.cio, self.cioo]
    }

    fn cross_group(adjacency: &AdjacencyMatrix, groups: &GroupDelimiters) -> f64 {
        let n = adjacency.len();
        let assignments = groups.assignments(n);
        let sizes = groups.group_sizes(n);

        let mut total = 0.0;
        for i in 0..n {
            let others = n - sizes[assignments[i]];
            if others == 0 {
                continue;
            }

            let mut links = 0usize;
            for j in 0..n {
                if assignments[j] == assignments[i] {
                    continue;
                }
                links += usize::from(adjacency.get(i, j)) + usize::from(adjacency.get(j, i));
            }

            total += links as f64 / (2 * others) as f64;
        }

        total / n as f64
    }
}
