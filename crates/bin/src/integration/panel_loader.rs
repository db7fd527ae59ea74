//! Loading return panels from CSV files.
//!
//! The header row names the firms. A leading column in which no value is
//! numeric (typically a date) is treated as a row label and skipped.

use contagion::network::GroupDelimiters;
use contagion::{EngineError, ReturnPanel};
use ndarray::Array2;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Error type for panel loading.
#[derive(Debug, thiserror::Error)]
pub(crate) enum PanelLoadError {
    /// Malformed CSV, including rows of unequal length.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// A return value could not be parsed.
    #[error("Row {row}, column '{column}': cannot parse '{value}' as a return")]
    Parse {
        /// 1-based data row.
        row: usize,
        /// Column header.
        column: String,
        /// Offending text.
        value: String,
    },
    /// The file holds no data rows.
    #[error("Panel file contains no observations")]
    Empty,
    /// Shape mismatch while assembling the matrix.
    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
    /// The assembled panel failed validation.
    #[error(transparent)]
    Panel(#[from] EngineError),
}

/// Read a return panel from `path`, splitting firms into groups at `groups`.
pub(crate) fn load_panel(path: &Path, groups: &[usize]) -> Result<ReturnPanel, PanelLoadError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let panel = read_panel(reader, groups)?;
    debug!(
        path = %path.display(),
        firms = panel.n_firms(),
        observations = panel.n_observations(),
        "loaded return panel"
    );
    Ok(panel)
}

fn read_panel<R: Read>(
    mut reader: csv::Reader<R>,
    groups: &[usize],
) -> Result<ReturnPanel, PanelLoadError> {
    let headers = reader.headers()?.clone();
    let records = reader.records().collect::<Result<Vec<_>, _>>()?;
    let first = records.first().ok_or(PanelLoadError::Empty)?;

    let is_label_column = first.get(0).is_some()
        && records
            .iter()
            .all(|record| record.get(0).is_none_or(|v| v.parse::<f64>().is_err()));
    let skip = usize::from(is_label_column);
    let firms: Vec<String> = headers.iter().skip(skip).map(str::to_string).collect();

    let mut values = Vec::with_capacity(records.len() * firms.len());
    for (row, record) in records.iter().enumerate() {
        for (column, field) in record.iter().skip(skip).enumerate() {
            let value = field.parse::<f64>().map_err(|_| PanelLoadError::Parse {
                row: row + 1,
                column: firms.get(column).cloned().unwrap_or_default(),
                value: field.to_string(),
            })?;
            values.push(value);
        }
    }

    let returns = Array2::from_shape_vec((records.len(), firms.len()), values)?;
    let groups = GroupDelimiters::new(groups.to_vec(), firms.len()).map_err(EngineError::from)?;
    Ok(ReturnPanel::new(returns, firms, groups)?)
}
