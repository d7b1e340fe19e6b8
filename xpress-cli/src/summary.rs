// XPress CLI - Run summary
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Machine-readable summary of one preparation run.

use serde::Serialize;
use std::path::Path;
use xpress::{Placement, PrepareMetrics};

/// Counts and placement of a finished run, written as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub version: &'static str,
    pub input: String,
    pub output: String,
    pub main_samples: usize,
    pub reference_samples: usize,
    pub main_cells: usize,
    pub empty_cells: usize,
    pub unassigned_samples: usize,
    pub placement: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appended_at_ms: Option<f64>,
    pub boundaries: usize,
    pub rows_dropped: usize,
    pub rows: usize,
}

impl RunSummary {
    pub fn new(input: &Path, output: &Path, metrics: &PrepareMetrics) -> Self {
        let (placement, appended_at_ms) = match metrics.placement {
            Some(Placement::Contained) => ("contained".to_string(), None),
            Some(Placement::Appended { start_ms, .. }) => ("appended".to_string(), Some(start_ms)),
            None => ("none".to_string(), None),
        };

        Self {
            version: xpress::VERSION,
            input: input.display().to_string(),
            output: output.display().to_string(),
            main_samples: metrics.main_samples,
            reference_samples: metrics.reference_samples,
            main_cells: metrics.main_cells(),
            empty_cells: metrics.main.empty_cells,
            unassigned_samples: metrics.main.unassigned_samples,
            placement,
            appended_at_ms,
            boundaries: metrics.merge.boundaries,
            rows_dropped: metrics.merge.rows_dropped,
            rows: metrics.merge.rows_kept,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
