// XPress - Press-forming data preparation
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Fixed-period time grid
//!
//! [`GridBuilder`] lays a uniform [`GRID_PERIOD_MS`] grid over the span of a
//! sorted stream and creates one zeroed [`Cell`] per grid point.

use crate::error::{PrepError, Result};
use crate::record::{Cell, Timestamp};
use crate::stream::SampleStream;
use crate::GRID_PERIOD_MS;
use chrono::Duration;
use log::debug;

/// Uniformly spaced grid points covering `[first, last]` of a stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    points: Vec<Timestamp>,
}

impl Grid {
    pub fn points(&self) -> &[Timestamp] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn start(&self) -> Option<Timestamp> {
        self.points.first().copied()
    }

    pub fn end(&self) -> Option<Timestamp> {
        self.points.last().copied()
    }
}

/// Number of grid points needed for a span: `ceil(span / period) + 1`.
pub fn grid_len(span: Duration) -> usize {
    if span <= Duration::zero() {
        return 1;
    }
    let mut steps = span.num_milliseconds() / GRID_PERIOD_MS;
    if Duration::milliseconds(steps * GRID_PERIOD_MS) < span {
        steps += 1;
    }
    steps as usize + 1
}

/// Builds grids and zeroed cell tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridBuilder;

impl GridBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the grid for `stream` and one zeroed cell per grid point.
    ///
    /// Elapsed time is filled in by [`GridBuilder::stamp_elapsed`]; cells keep
    /// the positional order of the grid.
    pub fn build(&self, stream: &SampleStream) -> Result<(Grid, Vec<Cell>)> {
        let (first, last) = stream.time_span().ok_or(PrepError::EmptyStream {
            stream: stream.kind(),
        })?;

        let len = grid_len(last - first);
        let period = Duration::milliseconds(GRID_PERIOD_MS);
        let mut points = Vec::with_capacity(len);
        let mut point = first;
        for _ in 0..len {
            points.push(point);
            point += period;
        }

        let mut cells: Vec<Cell> = points.iter().map(|&t| Cell::empty(t)).collect();
        Self::stamp_elapsed(&mut cells);

        debug!(
            "{} grid: {} points over {} samples",
            stream.kind(),
            points.len(),
            stream.len()
        );

        Ok((Grid { points }, cells))
    }

    /// Set `elapsed_ms` of every cell relative to the first cell, in order.
    pub fn stamp_elapsed(cells: &mut [Cell]) {
        let Some(start) = cells.first().map(|c| c.timestamp) else {
            return;
        };
        for cell in cells.iter_mut() {
            let offset = cell.timestamp - start;
            cell.elapsed_ms = offset.num_milliseconds() as f64;
        }
    }
}
