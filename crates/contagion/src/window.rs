//! Rolling window extraction
//!
//! Window `k` (0-based) covers rows `k..k + bandwidth` of the panel and is
//! identified by its 1-based ending observation `k + bandwidth`. The iterator
//! borrows the panel, so windows are views and nothing is copied.

use crate::error::{EngineError, Result};
use ndarray::{ArrayView2, s};

/// One window of consecutive observations
#[derive(Debug, Clone)]
pub struct Window<'a> {
    /// Position in window order, starting at 0
    pub index: usize,
    /// 1-based ending observation, in `[bandwidth, T_total]`
    pub end: usize,
    /// `bandwidth x N` view of the returns
    pub data: ArrayView2<'a, f64>,
}

/// Lazy, restartable sequence of overlapping windows
///
/// Cloning yields an independent iterator starting at the same position.
#[derive(Debug, Clone)]
pub struct Windows<'a> {
    panel: ArrayView2<'a, f64>,
    bandwidth: usize,
    next: usize,
    count: usize,
}

/// Split `panel` (observations x firms) into windows of `bandwidth` rows
///
/// # Errors
/// `InvalidWindow` when `bandwidth` is zero or exceeds the observation count.
pub fn windows(panel: ArrayView2<'_, f64>, bandwidth: usize) -> Result<Windows<'_>> {
    let observations = panel.nrows();
    if bandwidth == 0 || bandwidth > observations {
        return Err(EngineError::InvalidWindow {
            bandwidth,
            observations,
        });
    }

    Ok(Windows {
        panel,
        bandwidth,
        next: 0,
        count: observations - bandwidth + 1,
    })
}

impl<'a> Windows<'a> {
    /// Window length
    pub const fn bandwidth(&self) -> usize {
        self.bandwidth
    }

    /// Total number of windows, independent of iteration progress
    pub const fn count_total(&self) -> usize {
        self.count
    }

    /// Random access to window `index`
    pub fn get(&self, index: usize) -> Option<Window<'a>> {
        (index < self.count).then(|| Window {
            index,
            end: index + self.bandwidth,
            data: self.panel.slice_move(s![index..index + self.bandwidth, ..]),
        })
    }

    /// Iterator positioned back at the first window
    pub fn restart(&self) -> Self {
        Self {
            next: 0,
            ..self.clone()
        }
    }
}

impl<'a> Iterator for Windows<'a> {
    type Item = Window<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let window = self.get(self.next)?;
        self.next += 1;
        Some(window)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Windows<'_> {}
