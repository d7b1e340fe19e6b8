// XPress - Press-forming data preparation
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Preparation pipeline
//!
//! [`build_dataset`] is the pure core: grid, aggregate, align, merge.
//! [`Preparer`] wraps it with the data-access and status collaborators.
//!
//! ```text
//!  main samples ──► GridBuilder ──► CellAggregator(main) ──┐
//!                                                          ├─► ReferenceAligner ─► StreamMerger ─► FinalDataset
//!  ref samples  ──► GridBuilder ──► CellAggregator(ref)  ──┘
//! ```

use crate::aggregator::{AggregationReport, CellAggregator};
use crate::aligner::{Placement, ReferenceAligner};
use crate::config::PrepareRequest;
use crate::error::{PrepError, Result};
use crate::export;
use crate::grid::GridBuilder;
use crate::merger::StreamMerger;
use crate::metrics::PrepareMetrics;
use crate::record::{Cell, StreamKind};
use crate::source::{SampleQuery, SampleSource};
use crate::status::{format_count, StatusSink};
use crate::stream::SampleStream;
use log::info;
use std::io::Write;
use std::time::Instant;

/// The prepared, gridded and cleansed table.
#[derive(Debug, Clone)]
pub struct FinalDataset {
    rows: Vec<Cell>,
    metrics: PrepareMetrics,
}

impl FinalDataset {
    pub fn rows(&self) -> &[Cell] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Cell> {
        self.rows
    }

    pub fn metrics(&self) -> &PrepareMetrics {
        &self.metrics
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names, in output order.
    pub fn columns(&self) -> &'static [&'static str] {
        &export::COLUMNS
    }

    /// Write the dataset as delimited text with a header row.
    pub fn write_csv<W: Write>(&self, writer: W, delimiter: u8) -> Result<()> {
        export::write_rows(writer, delimiter, &self.rows)
    }
}

fn grid_and_aggregate(
    stream: &SampleStream,
    aggregator: CellAggregator,
    sink: &mut dyn StatusSink,
) -> Result<(Vec<Cell>, AggregationReport)> {
    let (grid, mut cells) = GridBuilder::new().build(stream)?;
    sink.status(&format!(
        "Grid built for {} stream ({} cells)",
        stream.kind(),
        format_count(cells.len())
    ));
    sink.status(match stream.kind() {
        StreamKind::Main => "Sample Process Data",
        StreamKind::Reference => "Sample Reference Curve",
    });
    let report = aggregator.aggregate(stream, &grid, &mut cells);
    Ok((cells, report))
}

/// Build the final dataset from a process stream and a reference curve.
///
/// Fails only when either stream is empty.
pub fn build_dataset(
    main: &SampleStream,
    reference: &SampleStream,
    sink: &mut dyn StatusSink,
) -> Result<FinalDataset> {
    for stream in [main, reference] {
        if stream.is_empty() {
            return Err(PrepError::EmptyStream {
                stream: stream.kind(),
            });
        }
    }

    sink.status("Create matrix with 10ms sample rate");
    let (ref_cells, ref_report) =
        grid_and_aggregate(reference, CellAggregator::reference(), sink)?;
    let (main_cells, main_report) = grid_and_aggregate(main, CellAggregator::main(), sink)?;

    let aligned = ReferenceAligner::new().align(main_cells, &ref_cells);
    match aligned.placement {
        Placement::Contained => sink.status("Reference Curve located within selection"),
        Placement::Appended { start_ms, period_ms } => {
            sink.status("Reference Curve located outside selection => Append");
            sink.status(&format!(
                "Appended at {}ms with sample period {}ms",
                start_ms, period_ms
            ));
        }
    }

    sink.status("Merge Data");
    let (rows, merge) = StreamMerger::new().merge(aligned.rows, &ref_cells);
    sink.status("Cleanse Matrix");
    sink.status(&format!(
        "Dataset ready (Rows: {} / dropped: {})",
        format_count(merge.rows_kept),
        format_count(merge.rows_dropped)
    ));

    let metrics = PrepareMetrics {
        main_samples: main.len(),
        reference_samples: reference.len(),
        main: main_report,
        reference: ref_report,
        placement: Some(aligned.placement),
        merge,
    };
    info!(
        "prepared {} rows from {} main and {} reference samples",
        merge.rows_kept,
        main.len(),
        reference.len()
    );

    Ok(FinalDataset { rows, metrics })
}

/// Build the final dataset from a process stream alone.
///
/// Reference placeholders stay zero.
pub fn build_main_dataset(main: &SampleStream, sink: &mut dyn StatusSink) -> Result<FinalDataset> {
    sink.status("Create matrix with 10ms sample rate");
    let (cells, main_report) = grid_and_aggregate(main, CellAggregator::main(), sink)?;

    sink.status("Cleanse Matrix");
    let (rows, merge) = StreamMerger::new().merge(cells, &[]);
    sink.status(&format!(
        "Dataset ready (Rows: {} / dropped: {})",
        format_count(merge.rows_kept),
        format_count(merge.rows_dropped)
    ));

    let metrics = PrepareMetrics {
        main_samples: main.len(),
        main: main_report,
        merge,
        ..Default::default()
    };
    Ok(FinalDataset { rows, metrics })
}

/// Drives a preparation run against a data source.
pub struct Preparer<'a, S: SampleSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: SampleSource + ?Sized> Preparer<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    fn fetch(
        &self,
        kind: StreamKind,
        query: &SampleQuery,
        sink: &mut dyn StatusSink,
    ) -> Result<SampleStream> {
        let started = Instant::now();
        let samples = match self.source.fetch(query) {
            Ok(samples) => samples,
            Err(err @ PrepError::MalformedQuery(_)) => {
                sink.status(&err.to_string());
                return Err(err);
            }
            Err(err) => return Err(err),
        };
        sink.status(&format!(
            "Query finished (Rows: {} / Duration: {:.1}sec)",
            format_count(samples.len()),
            started.elapsed().as_secs_f64()
        ));

        if samples.is_empty() {
            sink.status("No Data Found");
            return Err(PrepError::EmptyStream { stream: kind });
        }
        Ok(SampleStream::new(kind, samples))
    }

    /// Fetch, sort and prepare the streams named by `request`.
    pub fn run(&self, request: &PrepareRequest, sink: &mut dyn StatusSink) -> Result<FinalDataset> {
        sink.status("Loading process data");
        let main = self.fetch(StreamKind::Main, &request.main_query(), sink)?;

        let dataset = match request.reference_query() {
            Some(query) => {
                sink.status("Loading reference curve");
                let reference = self.fetch(StreamKind::Reference, &query, sink)?;
                build_dataset(&main, &reference, sink)?
            }
            None => build_main_dataset(&main, sink)?,
        };

        if dataset.is_empty() {
            sink.status("No Data Found");
        }
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Measurements, Sample, Timestamp};
    use crate::source::{MemorySource, TimeRange};
    use crate::status::MemoryStatusLog;
    use chrono::{Duration, NaiveDate};

    fn at(ms: i64) -> Timestamp {
        NaiveDate::from_ymd_opt(2021, 3, 1)
            .and_then(|d| d.and_hms_opt(8, 0, 0))
            .unwrap()
            + Duration::milliseconds(ms)
    }

    fn sample(ms: i64, stroke: i64, force: f64) -> Sample {
        Sample::new(at(ms))
            .with_stroke(stroke)
            .with_measurements(Measurements {
                force_left: force,
                ..Default::default()
            })
    }

    /// Samples every 4ms from `from` to `to`, all in one stroke.
    fn stroke(from: i64, to: i64, id: i64) -> Vec<Sample> {
        (from..=to)
            .step_by(4)
            .map(|t| sample(t, id, t as f64))
            .collect()
    }

    #[test]
    fn test_build_dataset_contained_reference() {
        let mut samples = stroke(0, 200, 7);
        samples.extend(stroke(300, 500, 8));
        let reference: Vec<Sample> = samples
            .iter()
            .filter(|s| s.state.stroke_id == 8)
            .cloned()
            .collect();

        let mut log = MemoryStatusLog::new();
        let dataset = build_dataset(
            &SampleStream::main(samples),
            &SampleStream::reference(reference),
            &mut log,
        )
        .unwrap();

        let metrics = dataset.metrics();
        assert_eq!(metrics.placement, Some(Placement::Contained));
        assert_eq!(metrics.merge.boundaries, 2);
        assert!(dataset.rows().iter().all(|c| c.is_populated()));
        assert!(log.contains("within selection"));
        assert!(log.contains("Cleanse Matrix"));
        // Splice starts on the first row of stroke 7 with reference row 0
        assert_eq!(dataset.rows()[0].reference.force_left, 300.0);
    }

    #[test]
    fn test_build_dataset_appends_outside_reference() {
        let main = SampleStream::main(stroke(0, 200, 7));
        let reference = SampleStream::reference(stroke(60_000, 60_040, 99));

        let mut log = MemoryStatusLog::new();
        let dataset = build_dataset(&main, &reference, &mut log).unwrap();
        assert!(log.contains("outside selection => Append"));

        let tail: Vec<&Cell> = dataset
            .rows()
            .iter()
            .filter(|c| c.state.stroke_id == 99)
            .collect();
        assert!(!tail.is_empty());
        let last_main = dataset
            .rows()
            .iter()
            .filter(|c| c.state.stroke_id == 7)
            .last()
            .unwrap();
        assert!(tail[0].elapsed_ms > last_main.elapsed_ms);
        for pair in tail.windows(2) {
            assert!(pair[1].elapsed_ms > pair[0].elapsed_ms);
        }
    }

    #[test]
    fn test_empty_reference_fails() {
        let main = SampleStream::main(stroke(0, 100, 1));
        let reference = SampleStream::reference(Vec::new());
        let err = build_dataset(&main, &reference, &mut MemoryStatusLog::new()).unwrap_err();
        assert!(matches!(
            err,
            PrepError::EmptyStream {
                stream: StreamKind::Reference
            }
        ));
    }

    #[test]
    fn test_main_only_dataset() {
        let main = SampleStream::main(stroke(0, 100, 1));
        let dataset = build_main_dataset(&main, &mut MemoryStatusLog::new()).unwrap();
        assert!(!dataset.is_empty());
        assert!(dataset.metrics().placement.is_none());
        assert!(dataset
            .rows()
            .iter()
            .all(|c| c.reference == Measurements::default()));
    }

    #[test]
    fn test_preparer_reports_no_data() {
        let source = MemorySource::new(stroke(0, 100, 1));
        let request = PrepareRequest::new(TimeRange::new(at(5_000), at(6_000)));
        let mut log = MemoryStatusLog::new();

        let err = Preparer::new(&source).run(&request, &mut log).unwrap_err();
        assert!(err.is_empty_stream());
        assert!(log.contains("No Data Found"));
        assert!(log.contains("Query finished (Rows: 0"));
    }

    #[test]
    fn test_preparer_reports_malformed_query() {
        let source = MemorySource::new(stroke(0, 100, 1));
        let mut request = PrepareRequest::new(TimeRange::new(at(-10), at(1_000)));
        request.order_number = Some("x'y".into());
        let mut log = MemoryStatusLog::new();

        let err = Preparer::new(&source).run(&request, &mut log).unwrap_err();
        assert!(matches!(err, PrepError::MalformedQuery(_)));
        assert!(log.contains("Query invalid"));
    }

    #[test]
    fn test_preparer_with_reference() {
        let mut samples = stroke(0, 200, 1);
        samples.extend(stroke(10_000, 10_100, 2));
        let source = MemorySource::new(samples);
        let request =
            PrepareRequest::new(TimeRange::new(at(-10), at(1_000))).with_reference_curve(2);
        let mut log = MemoryStatusLog::new();

        let dataset = Preparer::new(&source).run(&request, &mut log).unwrap();
        assert!(log.contains("Loading reference curve"));
        assert!(matches!(
            dataset.metrics().placement,
            Some(Placement::Appended { .. })
        ));
        assert!(dataset.rows().iter().any(|c| c.state.stroke_id == 2));
    }
}
