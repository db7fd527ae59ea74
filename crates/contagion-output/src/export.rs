//! CSV and JSON export of connectedness datasets.
//!
//! Each table of a dataset has a borrowed export view implementing
//! [`Exporter`]. [`write_dataset`] writes all of them into one directory.

use contagion::ConnectednessDataset;
use contagion::network::Measure;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(value)?),
        _ => Ok(serde_json::to_string(value)?),
    }
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
}

/// One row of the indicator time series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct IndicatorRecord {
    /// Window position, starting at 0.
    pub window: usize,

    /// 1-based ending observation of the window.
    pub end: usize,

    /// Dynamic causality index.
    pub dci: f64,

    /// Connections in and out.
    pub cio: f64,

    /// Connections in and out, other groups only.
    pub cioo: f64,
}

/// DCI, CIO and CIOO over time.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorSeries<'a> {
    dataset: &'a ConnectednessDataset,
}

impl<'a> IndicatorSeries<'a> {
    /// Export view over `dataset`.
    pub const fn new(dataset: &'a ConnectednessDataset) -> Self {
        Self { dataset }
    }

    /// Rows in window order.
    pub fn records(&self) -> Vec<IndicatorRecord> {
        let bandwidth = self.dataset.config().bandwidth;
        (0..self.dataset.n_windows())
            .filter_map(|window| {
                self.dataset
                    .indicators_at(window)
                    .map(|indicators| IndicatorRecord {
                        window,
                        end: window + bandwidth,
                        dci: indicators.dci,
                        cio: indicators.cio,
                        cioo: indicators.cioo,
                    })
            })
            .collect()
    }
}

impl Exporter for IndicatorSeries<'_> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        let records = self.records();
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for record in &records {
                    wtr.serialize(record)?;
                }
                finish_csv(wtr)
            }
            _ => to_json(&records, format),
        }
    }
}

/// JSON shape of a measure's `T x N` series.
#[derive(Debug, Serialize)]
struct MeasureSeriesJson<'a> {
    measure: Measure,
    firms: &'a [String],
    values: Vec<Vec<f64>>,
}

/// One centrality or degree measure over time, one column per firm.
#[derive(Debug, Clone, Copy)]
pub struct MeasureSeries<'a> {
    dataset: &'a ConnectednessDataset,
    measure: Measure,
}

impl<'a> MeasureSeries<'a> {
    /// Export view of `measure` over `dataset`.
    pub const fn new(dataset: &'a ConnectednessDataset, measure: Measure) -> Self {
        Self { dataset, measure }
    }
}

impl Exporter for MeasureSeries<'_> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        let series = self.dataset.series(self.measure);
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                let mut header = vec!["window".to_string()];
                header.extend(self.dataset.firms().iter().cloned());
                wtr.write_record(&header)?;

                for (window, row) in series.rows().into_iter().enumerate() {
                    let mut record = vec![window.to_string()];
                    record.extend(row.iter().map(f64::to_string));
                    wtr.write_record(&record)?;
                }
                finish_csv(wtr)
            }
            _ => to_json(
                &MeasureSeriesJson {
                    measure: self.measure,
                    firms: self.dataset.firms(),
                    values: series.rows().into_iter().map(|row| row.to_vec()).collect(),
                },
                format,
            ),
        }
    }
}

/// JSON shape of the average network.
#[derive(Debug, Serialize)]
struct AverageNetworkJson<'a> {
    firms: &'a [String],
    threshold: f64,
    adjacency: Vec<Vec<u8>>,
    values: Vec<Vec<f64>>,
}

/// Binarized average network with firm labels.
#[derive(Debug, Clone, Copy)]
pub struct AverageNetwork<'a> {
    dataset: &'a ConnectednessDataset,
}

impl<'a> AverageNetwork<'a> {
    /// Export view over `dataset`.
    pub const fn new(dataset: &'a ConnectednessDataset) -> Self {
        Self { dataset }
    }
}

impl Exporter for AverageNetwork<'_> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        let adjacency = self.dataset.average_adjacency().as_array();
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                let mut header = vec!["firm".to_string()];
                header.extend(self.dataset.firms().iter().cloned());
                wtr.write_record(&header)?;

                for (firm, row) in self.dataset.firms().iter().zip(adjacency.rows()) {
                    let mut record = vec![firm.clone()];
                    record.extend(row.iter().map(u8::to_string));
                    wtr.write_record(&record)?;
                }
                finish_csv(wtr)
            }
            _ => to_json(
                &AverageNetworkJson {
                    firms: self.dataset.firms(),
                    threshold: self.dataset.average_threshold(),
                    adjacency: adjacency.rows().into_iter().map(|row| row.to_vec()).collect(),
                    values: self
                        .dataset
                        .average_values()
                        .rows()
                        .into_iter()
                        .map(|row| row.to_vec())
                        .collect(),
                },
                format,
            ),
        }
    }
}

/// Average-network measures, one row per firm.
#[derive(Debug, Clone, Copy)]
pub struct AverageCentralities<'a> {
    dataset: &'a ConnectednessDataset,
}

impl<'a> AverageCentralities<'a> {
    /// Export view over `dataset`.
    pub const fn new(dataset: &'a ConnectednessDataset) -> Self {
        Self { dataset }
    }
}

impl Exporter for AverageCentralities<'_> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                let mut header = vec!["firm"];
                header.extend(Measure::ALL.iter().map(|m| m.name()));
                wtr.write_record(&header)?;

                for (node, firm) in self.dataset.firms().iter().enumerate() {
                    let mut record = vec![firm.clone()];
                    record.extend(
                        Measure::ALL
                            .iter()
                            .map(|&m| self.dataset.average(m)[node].to_string()),
                    );
                    wtr.write_record(&record)?;
                }
                finish_csv(wtr)
            }
            _ => to_json(self.dataset.average_metrics(), format),
        }
    }
}

impl Exporter for ConnectednessDataset {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => Err(ExportError::InvalidFormat(
                "a dataset spans several tables; use write_dataset for CSV".to_string(),
            )),
            _ => to_json(self, format),
        }
    }
}

/// Write every table of `dataset` into `dir`, creating it if needed.
///
/// CSV produces `indicators.csv`, one `<measure>.csv` per measure,
/// `average_network.csv` and `average_centralities.csv`. JSON produces a
/// single `dataset.json`. Returns the written paths.
pub fn write_dataset(
    dataset: &ConnectednessDataset,
    dir: &Path,
    format: ExportFormat,
) -> Result<Vec<PathBuf>, ExportError> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    let mut write = |name: &str, exporter: &dyn Exporter| -> Result<(), ExportError> {
        let path = dir.join(format!("{}.{}", name, format.extension()));
        exporter.export_to_file(&path, format)?;
        written.push(path);
        Ok(())
    };

    match format {
        ExportFormat::Csv => {
            write("indicators", &IndicatorSeries::new(dataset))?;
            for measure in Measure::ALL {
                write(measure.name(), &MeasureSeries::new(dataset, measure))?;
            }
            write("average_network", &AverageNetwork::new(dataset))?;
            write("average_centralities", &AverageCentralities::new(dataset))?;
        }
        ExportFormat::Json | ExportFormat::PrettyJson => write("dataset", dataset)?,
    }

    Ok(written)
}
