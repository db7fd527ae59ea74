//! Connectedness engine
//!
//! Ties the pipeline together: validate the configuration, cut the panel into
//! windows, schedule one causality-network task per window, then aggregate.

use crate::aggregate::Aggregator;
use crate::config::ConnectednessConfig;
use crate::dataset::ConnectednessDataset;
use crate::error::Result;
use crate::monitor::RunMonitor;
use crate::panel::ReturnPanel;
use crate::result::WindowResult;
use crate::scheduler::{Schedule, WindowScheduler};
use crate::window::{Window, windows};
use contagion_causality::CausalGraphBuilder;
use contagion_network::CentralityConfig;
use std::time::Instant;
use tracing::info;

/// Terminal outcome of a run that did not fail
#[derive(Debug)]
pub enum RunOutcome {
    /// Every window was processed
    Completed(ConnectednessDataset),
    /// The monitor requested a stop before all windows were collected
    Cancelled,
}

impl RunOutcome {
    /// Whether the run was cancelled
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Dataset of a completed run
    pub fn into_dataset(self) -> Option<ConnectednessDataset> {
        match self {
            Self::Completed(dataset) => Some(dataset),
            Self::Cancelled => None,
        }
    }
}

/// Validated, reusable pipeline for one configuration
#[derive(Debug)]
pub struct ConnectednessEngine {
    config: ConnectednessConfig,
    builder: CausalGraphBuilder,
    centrality: CentralityConfig,
    scheduler: WindowScheduler,
}

impl ConnectednessEngine {
    /// Validate `config` and build the worker pool
    pub fn new(config: ConnectednessConfig) -> Result<Self> {
        config.validate()?;
        let scheduler = WindowScheduler::new(config.threads)?;
        let builder = CausalGraphBuilder::new(config.granger());

        Ok(Self {
            config,
            builder,
            centrality: CentralityConfig::default(),
            scheduler,
        })
    }

    /// Override the centrality iteration settings
    pub const fn with_centrality(mut self, centrality: CentralityConfig) -> Self {
        self.centrality = centrality;
        self
    }

    /// Configuration in use
    pub const fn config(&self) -> &ConnectednessConfig {
        &self.config
    }

    /// Run the full pipeline over `panel`
    ///
    /// # Errors
    /// `InvalidWindow` before any dispatch when the panel is shorter than the
    /// bandwidth, `TaskFailure` when a window task fails.
    pub fn run<M>(&self, panel: &ReturnPanel, monitor: &M) -> Result<RunOutcome>
    where
        M: RunMonitor + ?Sized,
    {
        let started = Instant::now();
        let windows: Vec<Window<'_>> =
            windows(panel.returns().view(), self.config.bandwidth)?.collect();
        let n_windows = windows.len();

        info!(
            firms = panel.n_firms(),
            observations = panel.n_observations(),
            windows = n_windows,
            bandwidth = self.config.bandwidth,
            significance = self.config.significance,
            robust = self.config.robust,
            strength_threshold = self.config.strength_threshold,
            lags = self.config.lags,
            "starting connectedness run"
        );

        let mut dataset = ConnectednessDataset::new(
            panel.firms().to_vec(),
            panel.groups().clone(),
            self.config.clone(),
            n_windows,
        );

        let groups = panel.groups();
        let schedule = self.scheduler.run(
            n_windows,
            |k| WindowResult::compute(&windows[k], &self.builder, groups, &self.centrality),
            monitor,
        )?;

        let slots = match schedule {
            Schedule::Completed(slots) => slots,
            Schedule::Cancelled => {
                info!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "connectedness run cancelled"
                );
                return Ok(RunOutcome::Cancelled);
            }
        };

        Aggregator::new(self.centrality.clone()).finalize(&mut dataset, slots)?;

        info!(
            windows = n_windows,
            average_edges = dataset.average_adjacency().edge_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "connectedness run completed"
        );

        Ok(RunOutcome::Completed(dataset))
    }
}

/// Compute the connectedness dataset of `panel`
///
/// Validates `config`, then runs every window on a fresh worker pool. Returns
/// [`RunOutcome::Cancelled`] when `monitor` requests a stop.
pub fn compute<M>(
    panel: &ReturnPanel,
    config: &ConnectednessConfig,
    monitor: &M,
) -> Result<RunOutcome>
where
    M: RunMonitor + ?Sized,
{
    ConnectednessEngine::new(config.clone())?.run(panel, monitor)
}
