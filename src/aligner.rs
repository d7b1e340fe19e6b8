// XPress - Press-forming data preparation
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Placement of the reference curve relative to the process window
//!
//! A reference curve recorded inside the requested window is already part of
//! the main table and is matched later by its cycle identifier. A curve
//! recorded elsewhere is retimed and appended after the last process row.

use crate::record::Cell;
use crate::GRID_PERIOD_MS;
use log::{info, warn};
use std::fmt;

/// Where the reference curve ended up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Reference window lies within the main window; nothing appended.
    Contained,
    /// Reference rows were retimed and appended after the main rows.
    Appended {
        /// Elapsed time of the first appended row
        start_ms: f64,
        /// Step between appended rows
        period_ms: f64,
    },
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placement::Contained => write!(f, "within selection"),
            Placement::Appended { start_ms, period_ms } => write!(
                f,
                "appended at {:.1}ms every {:.1}ms",
                start_ms, period_ms
            ),
        }
    }
}

/// The combined table handed to the merger.
#[derive(Debug, Clone)]
pub struct AlignedTable {
    /// Main rows, followed by retimed reference rows when appended
    pub rows: Vec<Cell>,
    /// Number of leading rows that came from the main stream
    pub main_rows: usize,
    pub placement: Placement,
}

/// Decides containment and repositions the reference table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceAligner;

impl ReferenceAligner {
    pub fn new() -> Self {
        Self
    }

    /// True when `[ref_min, ref_max]` lies within `[main_min, main_max]`.
    ///
    /// Partial overlap counts as outside.
    pub fn is_contained(main: &[Cell], reference: &[Cell]) -> bool {
        match (main.first(), main.last(), reference.first(), reference.last()) {
            (Some(main_min), Some(main_max), Some(ref_min), Some(ref_max)) => {
                ref_min.timestamp >= main_min.timestamp && ref_max.timestamp <= main_max.timestamp
            }
            // Nothing to place
            _ => true,
        }
    }

    /// Step between the last two main rows, falling back to the grid period.
    pub fn trailing_period(main: &[Cell]) -> f64 {
        match main {
            [.., before, last] => last.elapsed_ms - before.elapsed_ms,
            _ => GRID_PERIOD_MS as f64,
        }
    }

    /// Combine `main` with `reference` according to their time windows.
    pub fn align(&self, main: Vec<Cell>, reference: &[Cell]) -> AlignedTable {
        let main_rows = main.len();

        if Self::is_contained(&main, reference) {
            info!("Reference curve located within selection");
            return AlignedTable {
                rows: main,
                main_rows,
                placement: Placement::Contained,
            };
        }

        let last_ms = main.last().map(|c| c.elapsed_ms).unwrap_or(0.0);
        let period_ms = Self::trailing_period(&main);
        let start_ms = last_ms + period_ms;
        warn!(
            "Reference curve located outside selection, appending at {}ms (period {}ms)",
            start_ms, period_ms
        );

        let mut rows = main;
        rows.reserve(reference.len());
        rows.extend(reference.iter().enumerate().map(|(i, cell)| {
            let mut cell = cell.clone();
            cell.elapsed_ms = start_ms + period_ms * i as f64;
            cell
        }));

        AlignedTable {
            rows,
            main_rows,
            placement: Placement::Appended {
                start_ms,
                period_ms,
            },
        }
    }
}
