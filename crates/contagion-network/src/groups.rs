//! Contiguous firm groups
//!
//! Firms are ordered so that members of a group (a sector, a country) are
//! adjacent. A delimiter `d` marks the 0-based index where a new group starts,
//! so delimiters `[3, 7]` over 10 firms yield groups `0..3`, `3..7` and
//! `7..10`. No delimiters means a single implicit group.

use crate::error::{NetworkError, Result};
use serde::{Deserialize, Serialize};

/// Ordered, strictly increasing group start indices
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDelimiters {
    delimiters: Vec<usize>,
}

impl GroupDelimiters {
    /// No explicit groups
    pub const fn none() -> Self {
        Self {
            delimiters: Vec::new(),
        }
    }

    /// Validate delimiters against a firm count
    pub fn new(delimiters: Vec<usize>, n_firms: usize) -> Result<Self> {
        let mut previous = 0;
        for &delimiter in &delimiters {
            if delimiter <= previous || delimiter >= n_firms {
                return Err(NetworkError::InvalidGroups(format!(
                    "delimiter {} must be increasing and within 1..{}",
                    delimiter, n_firms
                )));
            }
            previous = delimiter;
        }

        Ok(Self { delimiters })
    }

    /// Raw delimiters
    pub fn as_slice(&self) -> &[usize] {
        &self.delimiters
    }

    /// Whether no explicit groups are defined
    pub fn is_empty(&self) -> bool {
        self.delimiters.is_empty()
    }

    /// Number of groups (one implicit group when empty)
    pub fn group_count(&self) -> usize {
        self.delimiters.len() + 1
    }

    /// Group index of a firm
    pub fn group_of(&self, firm: usize) -> usize {
        self.delimiters.partition_point(|&d| d <= firm)
    }

    /// Group index of every firm
    pub fn assignments(&self, n_firms: usize) -> Vec<usize> {
        (0..n_firms).map(|firm| self.group_of(firm)).collect()
    }

    /// Size of every group
    pub fn group_sizes(&self, n_firms: usize) -> Vec<usize> {
        let mut sizes = vec![0; self.group_count()];
        for group in self.assignments(n_firms) {
            sizes[group] += 1;
        }
        sizes
    }
}
