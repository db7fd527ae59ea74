//! Validated panel of firm returns
//!
//! Rows are observations in time order, columns are firms. The firm order is
//! shared by every matrix and vector the engine produces.

use crate::error::{EngineError, Result};
use contagion_network::GroupDelimiters;
use ndarray::Array2;

/// Immutable `T_total x N` matrix of returns with firm names and groups
#[derive(Debug, Clone)]
pub struct ReturnPanel {
    returns: Array2<f64>,
    firms: Vec<String>,
    groups: GroupDelimiters,
}

impl ReturnPanel {
    /// Validate and wrap a return matrix
    ///
    /// # Arguments
    /// * `returns` - Observations x firms
    /// * `firms` - One name per column
    /// * `groups` - Group delimiters over the columns
    pub fn new(returns: Array2<f64>, firms: Vec<String>, groups: GroupDelimiters) -> Result<Self> {
        let (n_observations, n_firms) = returns.dim();

        if n_firms < 2 {
            return Err(EngineError::InvalidPanel(format!(
                "need at least 2 firms, got {}",
                n_firms
            )));
        }
        if n_observations == 0 {
            return Err(EngineError::InvalidPanel("panel has no observations".to_string()));
        }
        if firms.len() != n_firms {
            return Err(EngineError::InvalidPanel(format!(
                "{} firm names for {} columns",
                firms.len(),
                n_firms
            )));
        }
        if let Some(((t, i), value)) = returns.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(EngineError::InvalidPanel(format!(
                "non-finite return {} at observation {} for firm {}",
                value, t, firms[i]
            )));
        }

        // Re-validate against this panel's firm count
        let groups = GroupDelimiters::new(groups.as_slice().to_vec(), n_firms)?;

        Ok(Self {
            returns,
            firms,
            groups,
        })
    }

    /// Wrap a return matrix with generated firm names and no groups
    pub fn from_returns(returns: Array2<f64>) -> Result<Self> {
        let firms = (1..=returns.ncols()).map(|i| format!("Firm {}", i)).collect();
        Self::new(returns, firms, GroupDelimiters::none())
    }

    /// Replace the group delimiters
    pub fn with_groups(self, delimiters: Vec<usize>) -> Result<Self> {
        let groups = GroupDelimiters::new(delimiters, self.n_firms())?;
        Ok(Self { groups, ..self })
    }

    /// Return matrix
    pub const fn returns(&self) -> &Array2<f64> {
        &self.returns
    }

    /// Firm names in column order
    pub fn firms(&self) -> &[String] {
        &self.firms
    }

    /// Group delimiters
    pub const fn groups(&self) -> &GroupDelimiters {
        &self.groups
    }

    /// Number of firms N
    pub fn n_firms(&self) -> usize {
        self.returns.ncols()
    }

    /// Number of observations T_total
    pub fn n_observations(&self) -> usize {
        self.returns.nrows()
    }
}
