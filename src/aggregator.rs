// XPress - Press-forming data preparation
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Per-cell aggregation of irregular samples
//!
//! The [`CellAggregator`] buckets the samples of a sorted stream into the cells
//! of its grid and resolves every cell by majority vote (categorical state)
//! and arithmetic mean (numeric channels).
//!
//! ## Windowing
//!
//! Two cursors walk forward only. For grid point `x` the window is every
//! sample not yet consumed whose timestamp is `<= grid[x]`:
//!
//! ```text
//! samples:  |  s0  s1   s2 s3    s4        s5  s6 |
//! grid:     g0        g1       g2      g3       g4
//! windows:  [s0]    [s1 s2]  [s3 s4]   --    (unassigned)
//! ```
//!
//! A grid point whose window is empty leaves its cell zeroed. Samples after
//! the last grid point that still has a later sample are never assigned,
//! because their closing boundary is never observed.

use crate::grid::Grid;
use crate::record::{CategoricalField, Cell, Measurements, NumericChannel, Sample};
use crate::stream::SampleStream;
use log::debug;
use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Range;

/// Which measurement block of a cell receives the averaged channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelTarget {
    /// The cell's process channels
    Main,
    /// The cell's reference placeholder channels
    Reference,
}

impl ChannelTarget {
    fn select(self, cell: &mut Cell) -> &mut Measurements {
        match self {
            ChannelTarget::Main => &mut cell.main,
            ChannelTarget::Reference => &mut cell.reference,
        }
    }
}

/// Outcome of one aggregation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationReport {
    /// Cells that received at least one sample
    pub populated_cells: usize,
    /// Cells left at their zero default
    pub empty_cells: usize,
    /// Samples that fell into some window
    pub assigned_samples: usize,
    /// Trailing samples never assigned to a window
    pub unassigned_samples: usize,
}

/// Most frequent value of `values`.
///
/// Ties go to the value whose first occurrence comes first in scan order
/// among those reaching the maximum count. Returns `None` for no input.
pub fn most_common<T, I>(values: I) -> Option<T>
where
    T: Eq + Hash + Copy,
    I: IntoIterator<Item = T>,
{
    let values: Vec<T> = values.into_iter().collect();
    let mut counts: HashMap<T, usize> = HashMap::with_capacity(values.len());
    for &value in &values {
        *counts.entry(value).or_insert(0) += 1;
    }
    let max = counts.values().copied().max()?;
    values.into_iter().find(|v| counts.get(v) == Some(&max))
}

/// Arithmetic mean, `None` for no input.
pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Assign sample index windows to grid points.
///
/// Returns one entry per grid point: `Some(start..end)` when the point owns a
/// non-empty window, `None` otherwise. Windows are disjoint and increasing.
pub fn assign_windows(samples: &[Sample], grid: &Grid) -> Vec<Option<Range<usize>>> {
    let mut windows = Vec::with_capacity(grid.len());
    let mut start = 0;

    for point in grid.points() {
        // First sample strictly after this grid point closes the window.
        let end = samples[start..]
            .iter()
            .position(|s| s.timestamp > *point)
            .map(|offset| start + offset);

        match end {
            Some(end) if end > start => {
                windows.push(Some(start..end));
                start = end;
            }
            _ => windows.push(None),
        }
    }

    windows
}

/// Resolves grid cells from the raw samples of the same stream.
#[derive(Debug, Clone, Copy)]
pub struct CellAggregator {
    target: ChannelTarget,
}

impl CellAggregator {
    /// Create an aggregator writing numeric means into `target`.
    pub fn new(target: ChannelTarget) -> Self {
        Self { target }
    }

    /// Aggregator for the process stream.
    pub fn main() -> Self {
        Self::new(ChannelTarget::Main)
    }

    /// Aggregator for the reference stream.
    pub fn reference() -> Self {
        Self::new(ChannelTarget::Reference)
    }

    pub fn target(&self) -> ChannelTarget {
        self.target
    }

    /// Populate `cells` (built over `grid` from `stream`) in place.
    pub fn aggregate(
        &self,
        stream: &SampleStream,
        grid: &Grid,
        cells: &mut [Cell],
    ) -> AggregationReport {
        let samples = stream.samples();
        let mut report = AggregationReport::default();

        for (cell, window) in cells.iter_mut().zip(assign_windows(samples, grid)) {
            match window {
                Some(range) => {
                    report.assigned_samples += range.len();
                    report.populated_cells += 1;
                    self.resolve(cell, &samples[range]);
                }
                None => report.empty_cells += 1,
            }
        }
        report.unassigned_samples = samples.len() - report.assigned_samples;

        debug!(
            "{} aggregation: {} populated, {} empty, {} trailing samples unassigned",
            stream.kind(),
            report.populated_cells,
            report.empty_cells,
            report.unassigned_samples
        );

        report
    }

    fn resolve(&self, cell: &mut Cell, window: &[Sample]) {
        for field in CategoricalField::ALL {
            if let Some(value) = most_common(window.iter().map(|s| field.value(&s.state))) {
                field.assign(&mut cell.state, value);
            }
        }

        let target = self.target.select(cell);
        for channel in NumericChannel::ALL {
            if let Some(value) = mean(window.iter().map(|s| channel.get(&s.measurements))) {
                channel.set(target, value);
            }
        }
    }
}
