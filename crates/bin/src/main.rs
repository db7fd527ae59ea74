//! Contagion CLI binary.
//!
//! Provides the command-line interface for rolling-window connectedness
//! networks.

mod integration;

use clap::{Parser, Subcommand};
use contagion::{
    CancellationToken, ConnectednessConfig, ConnectednessDataset, ProgressMonitor, ReturnPanel,
    RunOutcome, compute,
};
use contagion_output::{ExportFormat, NetworkSummary, write_dataset};
use indicatif::{ProgressBar, ProgressStyle};
use integration::panel_loader::load_panel;
use integration::settings::{self, Overrides};
use std::path::PathBuf;
use std::process;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Exit status of a run stopped with Ctrl+C.
const EXIT_CANCELLED: i32 = 130;

#[derive(Parser)]
#[command(name = "contagion")]
#[command(about = "Contagion: rolling-window Granger causality networks", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the connectedness dataset of a return panel
    Run {
        /// CSV of returns: header of firm names, one row per observation
        #[arg(long, short)]
        input: PathBuf,

        /// 0-based first firm of each new group, e.g. 3,7
        #[arg(long, value_delimiter = ',')]
        groups: Vec<usize>,

        /// Window length in observations [21, 252]
        #[arg(long)]
        bandwidth: Option<usize>,

        /// Significance level of the causality test (0, 0.1]
        #[arg(long)]
        significance: Option<f64>,

        /// Use HAC-robust p-values
        #[arg(long)]
        robust: bool,

        /// Minimum causality strength (0, 0.2]
        #[arg(long)]
        strength: Option<f64>,

        /// Granger lag order [1, 10]
        #[arg(long)]
        lags: Option<usize>,

        /// Worker threads (default: one per core)
        #[arg(long)]
        threads: Option<usize>,

        /// Print the network summary
        #[arg(long)]
        analyze: bool,

        /// Print the summary as Markdown instead of a table
        #[arg(long, requires = "analyze")]
        markdown: bool,

        /// Directory for exported results
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Export format (csv, json or pretty-json)
        #[arg(long, default_value = "csv")]
        format: String,

        /// JSON run configuration; flags override its values
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the default run configuration as JSON
    Defaults,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(true) => {}
        Ok(false) => {
            eprintln!("Cancelled.");
            process::exit(EXIT_CANCELLED);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

/// Returns `false` when the run was cancelled.
fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Run {
            input,
            groups,
            bandwidth,
            significance,
            robust,
            strength,
            lags,
            threads,
            analyze,
            markdown,
            output_dir,
            format,
            config,
        } => {
            let overrides = Overrides {
                bandwidth,
                significance,
                robust,
                strength_threshold: strength,
                lags,
                threads,
                analyze,
            };
            let config = settings::resolve(config.as_deref(), &overrides)?;
            let format: ExportFormat = format.parse()?;
            let panel = load_panel(&input, &groups)?;

            let Some(dataset) = run_with_progress(&panel, &config)? else {
                return Ok(false);
            };

            if config.analyze {
                let summary = NetworkSummary::from_dataset(&dataset);
                if markdown {
                    println!("{}", summary.to_markdown());
                } else {
                    println!("{}", summary.to_ascii_table());
                }
            }

            if let Some(dir) = output_dir {
                let written = write_dataset(&dataset, &dir, format)?;
                for path in &written {
                    println!("Wrote {}", path.display());
                }
            }
        }
        Commands::Defaults => {
            println!(
                "{}",
                serde_json::to_string_pretty(&ConnectednessConfig::default())?
            );
        }
    }

    Ok(true)
}

fn run_with_progress(
    panel: &ReturnPanel,
    config: &ConnectednessConfig,
) -> Result<Option<ConnectednessDataset>, Box<dyn std::error::Error>> {
    let n_windows = (panel.n_observations() + 1).saturating_sub(config.bandwidth) as u64;

    let token = CancellationToken::new();
    let handler_token = token.clone();
    ctrlc::set_handler(move || handler_token.cancel())?;

    let pb = ProgressBar::new(n_windows);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} windows {msg}")?
            .progress_chars("#>-"),
    );
    pb.set_message(format!("{} firms", panel.n_firms()));

    let monitor = ProgressMonitor::with_token(
        |fraction| pb.set_position((fraction * n_windows as f64).round() as u64),
        token,
    );

    match compute(panel, config, &monitor) {
        Ok(RunOutcome::Completed(dataset)) => {
            pb.finish_with_message("done");
            info!(
                windows = dataset.n_windows(),
                links = dataset.average_adjacency().edge_count(),
                "average network ready"
            );
            Ok(Some(dataset))
        }
        Ok(RunOutcome::Cancelled) => {
            pb.abandon_with_message("cancelled");
            warn!("run cancelled by user");
            Ok(None)
        }
        Err(e) => {
            pb.abandon_with_message("failed");
            Err(e.into())
        }
    }
}
