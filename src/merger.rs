// XPress - Press-forming data preparation
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Splicing of reference channels at cycle boundaries
//!
//! A cycle boundary is a row whose stroke counter is positive and differs
//! from the last counter that started a splice. At each boundary the
//! reference table's channels are copied row-by-row into the reference
//! placeholders, overwriting whatever an earlier boundary wrote.

use crate::record::Cell;
use log::debug;

/// Outcome of a merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Cycle boundaries detected
    pub boundaries: usize,
    /// Rows removed by the cleanse step
    pub rows_dropped: usize,
    /// Rows kept
    pub rows_kept: usize,
}

/// Splices reference channels into the main table and drops empty rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamMerger;

impl StreamMerger {
    pub fn new() -> Self {
        Self
    }

    /// Copy `reference` channels into `rows` at every cycle boundary.
    ///
    /// Returns the number of boundaries found.
    pub fn splice(&self, rows: &mut [Cell], reference: &[Cell]) -> usize {
        let mut current: Option<i64> = None;
        let mut boundaries = 0;

        for i in 0..rows.len() {
            let stroke = rows[i].state.stroke_id;
            if stroke > 0 && current != Some(stroke) {
                for (row, source) in rows[i..].iter_mut().zip(reference) {
                    row.reference = source.reference;
                }
                current = Some(stroke);
                boundaries += 1;
            }
        }

        boundaries
    }

    /// Remove rows that never received samples, keeping order.
    ///
    /// Returns the number of rows removed.
    pub fn cleanse(&self, rows: &mut Vec<Cell>) -> usize {
        let before = rows.len();
        rows.retain(Cell::is_populated);
        before - rows.len()
    }

    /// Splice then cleanse.
    pub fn merge(&self, mut rows: Vec<Cell>, reference: &[Cell]) -> (Vec<Cell>, MergeReport) {
        let boundaries = self.splice(&mut rows, reference);
        let rows_dropped = self.cleanse(&mut rows);

        debug!(
            "merge: {} boundaries, {} rows dropped, {} kept",
            boundaries,
            rows_dropped,
            rows.len()
        );

        let report = MergeReport {
            boundaries,
            rows_dropped,
            rows_kept: rows.len(),
        };
        (rows, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Measurements, Timestamp};
    use chrono::{Duration, NaiveDate};

    fn at(ms: i64) -> Timestamp {
        NaiveDate::from_ymd_opt(2021, 3, 1)
            .and_then(|d| d.and_hms_opt(8, 0, 0))
            .unwrap()
            + Duration::milliseconds(ms)
    }

    fn rows(strokes: &[i64]) -> Vec<Cell> {
        strokes
            .iter()
            .enumerate()
            .map(|(i, &s)| {
                let mut cell = Cell::empty(at(i as i64 * 10));
                cell.state.stroke_id = s;
                cell
            })
            .collect()
    }

    fn reference(values: &[f64]) -> Vec<Cell> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let mut cell = Cell::empty(at(100_000 + i as i64 * 10));
                cell.reference = Measurements {
                    force_left: v,
                    force_right: v * 2.0,
                    position_combined: v * 3.0,
                    position_left: v * 4.0,
                };
                cell
            })
            .collect()
    }

    fn force(rows: &[Cell]) -> Vec<f64> {
        rows.iter().map(|c| c.reference.force_left).collect()
    }

    #[test]
    fn test_splice_at_each_boundary() {
        let mut table = rows(&[0, 0, 5, 5, 5, 7, 7]);
        let boundaries = StreamMerger::new().splice(&mut table, &reference(&[1.0, 2.0]));

        assert_eq!(boundaries, 2);
        assert_eq!(force(&table), vec![0.0, 0.0, 1.0, 2.0, 0.0, 1.0, 2.0]);
        assert_eq!(table[3].reference.position_left, 8.0);
    }

    #[test]
    fn test_later_boundary_overwrites_inflight_copy() {
        let mut table = rows(&[0, 0, 5, 5, 5, 7, 7]);
        StreamMerger::new().splice(&mut table, &reference(&[1.0, 2.0, 3.0, 4.0]));

        // The 5-splice would have written 4.0 at row 5; the 7-splice wins
        assert_eq!(force(&table), vec![0.0, 0.0, 1.0, 2.0, 3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_splice_truncates_at_table_end() {
        let mut table = rows(&[3, 3]);
        StreamMerger::new().splice(&mut table, &reference(&[1.0, 2.0, 3.0, 4.0]));
        assert_eq!(force(&table), vec![1.0, 2.0]);
    }

    #[test]
    fn test_zero_rows_do_not_reset_tracking() {
        let mut table = rows(&[4, 0, 4]);
        let boundaries = StreamMerger::new().splice(&mut table, &reference(&[1.0]));
        assert_eq!(boundaries, 1);
        assert_eq!(force(&table), vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_merge_drops_empty_rows_in_order() {
        let (kept, report) =
            StreamMerger::new().merge(rows(&[0, 2, 0, 2, 3, 0]), &reference(&[9.0]));
        let strokes: Vec<i64> = kept.iter().map(|c| c.state.stroke_id).collect();

        assert_eq!(strokes, vec![2, 2, 3]);
        assert_eq!(
            report,
            MergeReport {
                boundaries: 2,
                rows_dropped: 3,
                rows_kept: 3
            }
        );
        assert_eq!(force(&kept), vec![9.0, 0.0, 9.0]);
    }
}
