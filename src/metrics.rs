//! Metrics collection for a preparation run
//!
//! Counts gathered along the pipeline: raw samples, grid cells, empty
//! windows, cycle boundaries and the cleanse result.

use crate::aggregator::AggregationReport;
use crate::aligner::Placement;
use crate::merger::MergeReport;

/// Statistics of one preparation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrepareMetrics {
    /// Raw samples in the main stream
    pub main_samples: usize,
    /// Raw samples in the reference stream
    pub reference_samples: usize,
    /// Aggregation outcome of the main stream
    pub main: AggregationReport,
    /// Aggregation outcome of the reference stream
    pub reference: AggregationReport,
    /// Where the reference curve was placed (None without a reference)
    pub placement: Option<Placement>,
    /// Splice and cleanse outcome
    pub merge: MergeReport,
}

impl PrepareMetrics {
    /// Total grid cells of the main stream
    pub fn main_cells(&self) -> usize {
        self.main.populated_cells + self.main.empty_cells
    }

    /// Total grid cells of the reference stream
    pub fn reference_cells(&self) -> usize {
        self.reference.populated_cells + self.reference.empty_cells
    }

    /// Fraction of main cells that received samples (0.0 - 1.0)
    pub fn fill_ratio(&self) -> f64 {
        let cells = self.main_cells();
        if cells == 0 {
            return 0.0;
        }
        self.main.populated_cells as f64 / cells as f64
    }

    /// Generate a human-readable report
    pub fn report(&self) -> String {
        let mut report = String::new();

        report.push_str("=== XPress Preparation Metrics ===\n\n");

        report.push_str(&format!("Main samples: {}\n", self.main_samples));
        report.push_str(&format!(
            "Main cells: {} ({} populated, {} empty, {:.1}% filled)\n",
            self.main_cells(),
            self.main.populated_cells,
            self.main.empty_cells,
            self.fill_ratio() * 100.0
        ));
        if self.main.unassigned_samples > 0 {
            report.push_str(&format!(
                "Trailing samples unassigned: {}\n",
                self.main.unassigned_samples
            ));
        }

        match &self.placement {
            Some(placement) => {
                report.push_str(&format!(
                    "\nReference samples: {}\n",
                    self.reference_samples
                ));
                report.push_str(&format!(
                    "Reference cells: {} ({} populated)\n",
                    self.reference_cells(),
                    self.reference.populated_cells
                ));
                report.push_str(&format!("Reference placement: {}\n", placement));
            }
            None => report.push_str("\nReference curve: none\n"),
        }

        report.push_str(&format!(
            "\nCycle boundaries: {}\n",
            self.merge.boundaries
        ));
        report.push_str(&format!("Rows dropped: {}\n", self.merge.rows_dropped));
        report.push_str(&format!("Rows kept: {}\n", self.merge.rows_kept));

        report
    }
}
