//! Network summary of a connectedness run.
//!
//! The summary is the analyzer applied to a finished dataset: statistics of
//! the indicator time series and the firms of the average network ranked by
//! eigenvector centrality.

use contagion::ConnectednessDataset;
use contagion::network::{ConnectednessIndicators, Measure};
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Statistics of one indicator over all windows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndicatorStats {
    /// Indicator name.
    pub name: String,

    /// Mean over windows.
    pub mean: f64,

    /// Smallest value.
    pub min: f64,

    /// Largest value.
    pub max: f64,

    /// Value of the most recent window.
    pub last: f64,
}

impl IndicatorStats {
    /// Compute statistics of `series`; all zero when the series is empty.
    pub fn from_series(name: &str, series: ArrayView1<'_, f64>) -> Self {
        let Some(&last) = series.last() else {
            return Self {
                name: name.to_string(),
                mean: 0.0,
                min: 0.0,
                max: 0.0,
                last: 0.0,
            };
        };

        let min = series.iter().copied().fold(f64::INFINITY, f64::min);
        let max = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        // Summation rounding can leave the mean just outside the range
        let mean = (series.sum() / series.len() as f64).max(min).min(max);

        Self {
            name: name.to_string(),
            mean,
            min,
            max,
            last,
        }
    }
}

impl fmt::Display for IndicatorStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: mean {:.4} (min {:.4}, max {:.4}, last {:.4})",
            self.name, self.mean, self.min, self.max, self.last
        )
    }
}

/// Average-network measures of one firm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FirmCentrality {
    /// Firm name.
    pub firm: String,

    /// Group index, 0 when the panel has no groups.
    pub group: usize,

    /// Incoming links.
    pub in_degree: f64,

    /// Outgoing links.
    pub out_degree: f64,

    /// Betweenness centrality.
    pub betweenness: f64,

    /// Closeness centrality.
    pub closeness: f64,

    /// Eigenvector centrality.
    pub eigenvector: f64,

    /// Katz centrality.
    pub katz: f64,

    /// Clustering coefficient.
    pub clustering: f64,
}

/// Summary report of a connectedness dataset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkSummary {
    /// Number of firms.
    pub n_firms: usize,

    /// Number of windows.
    pub n_windows: usize,

    /// Window length.
    pub bandwidth: usize,

    /// Significance level of the causality test.
    pub significance: f64,

    /// Whether robust p-values were used.
    pub robust: bool,

    /// Minimum causality strength.
    pub strength_threshold: f64,

    /// Threshold that binarized the average network.
    pub threshold: f64,

    /// Links in the average network.
    pub average_edges: usize,

    /// Indicators of the average network.
    pub average_indicators: ConnectednessIndicators,

    /// DCI, CIO and CIOO statistics over time.
    pub indicators: Vec<IndicatorStats>,

    /// Firms by decreasing eigenvector centrality.
    pub firms: Vec<FirmCentrality>,
}

impl NetworkSummary {
    /// Summarize `dataset`.
    pub fn from_dataset(dataset: &ConnectednessDataset) -> Self {
        let config = dataset.config();
        let assignments = dataset.groups().assignments(dataset.n_firms());
        let value = |measure: Measure, node: usize| dataset.average(measure)[node];

        let mut firms: Vec<FirmCentrality> = dataset
            .firms()
            .iter()
            .enumerate()
            .map(|(node, firm)| FirmCentrality {
                firm: firm.clone(),
                group: assignments[node],
                in_degree: value(Measure::InDegree, node),
                out_degree: value(Measure::OutDegree, node),
                betweenness: value(Measure::Betweenness, node),
                closeness: value(Measure::Closeness, node),
                eigenvector: value(Measure::Eigenvector, node),
                katz: value(Measure::Katz, node),
                clustering: value(Measure::Clustering, node),
            })
            .collect();
        firms.sort_by(rank);

        Self {
            n_firms: dataset.n_firms(),
            n_windows: dataset.n_windows(),
            bandwidth: config.bandwidth,
            significance: config.significance,
            robust: config.robust,
            strength_threshold: config.strength_threshold,
            threshold: dataset.average_threshold(),
            average_edges: dataset.average_adjacency().edge_count(),
            average_indicators: dataset.average_metrics().indicators,
            indicators: vec![
                IndicatorStats::from_series("DCI", dataset.dci()),
                IndicatorStats::from_series("CIO", dataset.cio()),
                IndicatorStats::from_series("CIOO", dataset.cioo()),
            ],
            firms,
        }
    }

    /// The `n` highest ranked firms.
    pub fn top(&self, n: usize) -> &[FirmCentrality] {
        &self.firms[..n.min(self.firms.len())]
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\nConnectedness Summary: {} firms, {} windows\n",
            self.n_firms, self.n_windows
        ));
        output.push_str(&format!(
            "Bandwidth: {}  Significance: {}  Robust: {}  Strength: {}\n",
            self.bandwidth, self.significance, self.robust, self.strength_threshold
        ));
        output.push_str(&"=".repeat(100));
        output.push('\n');

        output.push_str("\nIndicators Over Time:\n");
        output.push_str(&"-".repeat(100));
        output.push('\n');
        output.push_str(&format!(
            "{:<10} {:>12} {:>12} {:>12} {:>12}\n",
            "Indicator", "Mean", "Min", "Max", "Last"
        ));
        for stats in &self.indicators {
            output.push_str(&format!(
                "{:<10} {:>12.4} {:>12.4} {:>12.4} {:>12.4}\n",
                stats.name, stats.mean, stats.min, stats.max, stats.last
            ));
        }

        output.push_str("\nAverage Network:\n");
        output.push_str(&"-".repeat(100));
        output.push('\n');
        output.push_str(&format!(
            "  Threshold:  {:.4}\n  Links:      {}\n  DCI:        {:.4}\n  CIO:        {:.4}\n  CIOO:       {:.4}\n",
            self.threshold,
            self.average_edges,
            self.average_indicators.dci,
            self.average_indicators.cio,
            self.average_indicators.cioo
        ));

        if !self.firms.is_empty() {
            output.push_str("\nFirm Centralities:\n");
            output.push_str(&"-".repeat(100));
            output.push('\n');
            output.push_str(&format!(
                "{:<16} {:>5} {:>6} {:>6} {:>11} {:>10} {:>11} {:>8} {:>10}\n",
                "Firm", "Group", "In", "Out", "Betweenness", "Closeness", "Eigenvector", "Katz",
                "Clustering"
            ));
            for firm in &self.firms {
                output.push_str(&format!(
                    "{:<16} {:>5} {:>6} {:>6} {:>11.4} {:>10.4} {:>11.4} {:>8.4} {:>10.4}\n",
                    firm.firm,
                    firm.group,
                    firm.in_degree,
                    firm.out_degree,
                    firm.betweenness,
                    firm.closeness,
                    firm.eigenvector,
                    firm.katz,
                    firm.clustering
                ));
            }
        }

        output.push_str(&"=".repeat(100));
        output.push('\n');

        output
    }

    /// Format as Markdown for documentation.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str("# Connectedness Summary\n\n");
        output.push_str(&format!(
            "**Firms:** {} | **Windows:** {} | **Bandwidth:** {} | **Significance:** {} | **Robust:** {} | **Strength:** {}\n\n",
            self.n_firms,
            self.n_windows,
            self.bandwidth,
            self.significance,
            self.robust,
            self.strength_threshold
        ));

        output.push_str("## Indicators Over Time\n\n");
        output.push_str("| Indicator | Mean | Min | Max | Last |\n");
        output.push_str("|-----------|------|-----|-----|------|\n");
        for stats in &self.indicators {
            output.push_str(&format!(
                "| {} | {:.4} | {:.4} | {:.4} | {:.4} |\n",
                stats.name, stats.mean, stats.min, stats.max, stats.last
            ));
        }

        output.push_str("\n## Average Network\n\n");
        output.push_str(&format!("- **Threshold:** {:.4}\n", self.threshold));
        output.push_str(&format!("- **Links:** {}\n", self.average_edges));
        output.push_str(&format!("- **DCI:** {:.4}\n", self.average_indicators.dci));
        output.push_str(&format!("- **CIO:** {:.4}\n", self.average_indicators.cio));
        output.push_str(&format!("- **CIOO:** {:.4}\n\n", self.average_indicators.cioo));

        if !self.firms.is_empty() {
            output.push_str("## Firm Centralities\n\n");
            output.push_str(
                "| Firm | Group | In | Out | Betweenness | Closeness | Eigenvector | Katz | Clustering |\n",
            );
            output.push_str(
                "|------|-------|----|-----|-------------|-----------|-------------|------|------------|\n",
            );
            for firm in &self.firms {
                output.push_str(&format!(
                    "| {} | {} | {} | {} | {:.4} | {:.4} | {:.4} | {:.4} | {:.4} |\n",
                    firm.firm,
                    firm.group,
                    firm.in_degree,
                    firm.out_degree,
                    firm.betweenness,
                    firm.closeness,
                    firm.eigenvector,
                    firm.katz,
                    firm.clustering
                ));
            }
        }

        output
    }
}

impl fmt::Display for NetworkSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Connectedness: {} firms over {} windows (bandwidth {})",
            self.n_firms, self.n_windows, self.bandwidth
        )?;
        for stats in &self.indicators {
            writeln!(f, "  {}", stats)?;
        }
        writeln!(
            f,
            "  Average network: {} links, DCI {:.4}",
            self.average_edges, self.average_indicators.dci
        )?;
        if let Some(leader) = self.firms.first() {
            writeln!(f, "  Most central: {} ({:.4})", leader.firm, leader.eigenvector)?;
        }
        Ok(())
    }
}

/// Decreasing eigenvector, then decreasing Katz, then name.
fn rank(a: &FirmCentrality, b: &FirmCentrality) -> Ordering {
    b.eigenvector
        .total_cmp(&a.eigenvector)
        .then_with(|| b.katz.total_cmp(&a.katz))
        .then_with(|| a.firm.cmp(&b.firm))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use contagion::network::{AdjacencyMatrix, CentralityConfig, GroupDelimiters};
    use contagion::{Aggregator, ConnectednessConfig, WindowResult};
    use ndarray::{Array1, array};

    /// Star around firm "Hub" in every window
    fn star_dataset(n_windows: usize) -> ConnectednessDataset {
        let firms = vec![
            "Leaf A".to_string(),
            "Hub".to_string(),
            "Leaf B".to_string(),
            "Leaf C".to_string(),
        ];
        let groups = GroupDelimiters::new(vec![2], 4).unwrap();
        let mut dataset = ConnectednessDataset::new(
            firms,
            groups.clone(),
            ConnectednessConfig::default(),
            n_windows,
        );

        let results = (0..n_windows)
            .map(|window| {
                let mut adjacency = AdjacencyMatrix::empty(4);
                for leaf in [0, 2, 3] {
                    adjacency.set(1, leaf, true);
                }
                Some(WindowResult::from_adjacency(
                    window,
                    adjacency,
                    &groups,
                    &CentralityConfig::default(),
                ))
            })
            .collect();
        Aggregator::default().finalize(&mut dataset, results).unwrap();
        dataset
    }

    #[test]
    fn test_indicator_stats() {
        let stats = IndicatorStats::from_series("DCI", array![0.1, 0.4, 0.2].view());
        assert_relative_eq!(stats.mean, 0.7 / 3.0);
        assert_relative_eq!(stats.min, 0.1);
        assert_relative_eq!(stats.max, 0.4);
        assert_relative_eq!(stats.last, 0.2);
    }

    #[test]
    fn test_indicator_stats_constant_series() {
        let series = Array1::from_elem(21, 1.0 / 3.0);
        let stats = IndicatorStats::from_series("DCI", series.view());
        assert!(stats.min <= stats.mean && stats.mean <= stats.max);
        assert_eq!(stats.mean, 1.0 / 3.0);
    }

    #[test]
    fn test_indicator_stats_empty() {
        let empty: [f64; 0] = [];
        let stats = IndicatorStats::from_series("CIO", ArrayView1::from(&empty[..]));
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.last, 0.0);
    }

    #[test]
    fn test_hub_ranks_first() {
        let summary = NetworkSummary::from_dataset(&star_dataset(3));
        assert_eq!(summary.n_windows, 3);
        assert_eq!(summary.average_edges, 3);
        assert_eq!(summary.firms[0].firm, "Hub");
        assert_eq!(summary.firms[0].group, 0);
        assert_relative_eq!(summary.firms[0].out_degree, 3.0);
        assert_relative_eq!(summary.firms[0].betweenness, 1.0);
        assert_eq!(summary.top(2).len(), 2);
        assert_eq!(summary.top(10).len(), 4);
        // Ties among leaves resolve by name
        assert_eq!(summary.firms[1].firm, "Leaf A");
    }

    #[test]
    fn test_renderings() {
        let summary = NetworkSummary::from_dataset(&star_dataset(2));

        let ascii = summary.to_ascii_table();
        assert!(ascii.contains("Connectedness Summary"));
        assert!(ascii.contains("Hub"));
        assert!(ascii.contains("CIOO"));

        let markdown = summary.to_markdown();
        assert!(markdown.contains("# Connectedness Summary"));
        assert!(markdown.contains("| Firm | Group |"));
        assert!(markdown.contains("| Hub |"));

        assert!(summary.to_string().contains("Most central: Hub"));
    }
}
