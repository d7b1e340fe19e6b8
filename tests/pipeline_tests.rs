// XPress - Integration Tests
//
// Covers the resampling pipeline end to end:
// 1. Grid
// 2. Aggregation
// 3. Reference placement
// 4. Cycle splicing
// 5. End-to-end scenario and driver

use chrono::{Duration, NaiveDate};
use xpress::aggregator::assign_windows;
use xpress::{
    build_dataset, build_main_dataset, most_common, CellAggregator, GridBuilder, MachineState,
    Measurements, MemorySource, MemoryStatusLog, Placement, PrepConfig, PrepError, Preparer,
    Sample, SampleStream, StreamKind, Timestamp, COLUMNS, GRID_PERIOD_MS,
};

fn at(ms: i64) -> Timestamp {
    NaiveDate::from_ymd_opt(2021, 3, 1)
        .and_then(|d| d.and_hms_opt(8, 0, 0))
        .unwrap()
        + Duration::milliseconds(ms)
}

fn sample(ms: i64, stroke: i64, operation_state: &str, force: f64) -> Sample {
    Sample::new(at(ms))
        .with_state(MachineState {
            work_center: "XP01".to_string(),
            operation_state: operation_state.to_string(),
            stroke_id: stroke,
            ..Default::default()
        })
        .with_measurements(Measurements {
            force_left: force,
            force_right: force * 2.0,
            position_combined: force * 3.0,
            position_left: force * 4.0,
        })
}

/// Irregular timestamps: gaps cycle through 3, 5, 7, 4, 6 ms up to `limit_ms`.
fn irregular_times(limit_ms: i64) -> Vec<i64> {
    let gaps = [3, 5, 7, 4, 6];
    let mut times = vec![0];
    let mut i = 0;
    loop {
        let next = times[times.len() - 1] + gaps[i % gaps.len()];
        if next > limit_ms {
            break;
        }
        times.push(next);
        i += 1;
    }
    times
}

// ============================================================================
// Grid Tests
// ============================================================================

#[test]
fn test_grid_length_and_spacing() {
    let times = irregular_times(1000);
    let stream = SampleStream::main(times.iter().map(|&t| sample(t, 1, "A", 0.0)).collect());
    let (grid, cells) = GridBuilder::new().build(&stream).unwrap();

    let span = times[times.len() - 1] - times[0];
    let expected = ((span + GRID_PERIOD_MS - 1) / GRID_PERIOD_MS + 1) as usize;
    assert_eq!(grid.len(), expected);
    for pair in cells.windows(2) {
        assert_eq!(pair[1].elapsed_ms - pair[0].elapsed_ms, 10.0);
    }
}

// ============================================================================
// Aggregation Tests
// ============================================================================

#[test]
fn test_mode_and_mean_in_one_window() {
    // Window of grid point 10 holds t = 2..=10: A A B B A
    let stream = SampleStream::main(vec![
        sample(0, 1, "A", 0.0),
        sample(2, 1, "A", 10.0),
        sample(4, 1, "A", 20.0),
        sample(6, 1, "B", 30.0),
        sample(8, 1, "B", 10.0),
        sample(10, 1, "A", 30.0),
        sample(15, 1, "C", 0.0),
    ]);
    let (grid, mut cells) = GridBuilder::new().build(&stream).unwrap();
    CellAggregator::main().aggregate(&stream, &grid, &mut cells);

    assert_eq!(cells[1].state.operation_state, "A");
    approx::assert_abs_diff_eq!(cells[1].main.force_left, 20.0);
    approx::assert_abs_diff_eq!(cells[1].main.position_left, 80.0);
}

#[test]
fn test_tie_break_is_first_in_scan_order() {
    assert_eq!(most_common(["B", "A", "A", "B"]), Some("B"));
    assert_eq!(most_common(["A", "B"]), Some("A"));
    assert_eq!(most_common(["B", "A"]), Some("B"));
}

#[test]
fn test_cursor_never_rewinds() {
    let times = irregular_times(500);
    let mut samples: Vec<Sample> = times.iter().map(|&t| sample(t, 1, "A", 0.0)).collect();
    // Duplicate timestamps and a gap
    samples.push(sample(100, 1, "A", 0.0));
    samples.push(sample(100, 1, "A", 0.0));
    samples.retain(|s| s.timestamp < at(200) || s.timestamp > at(260));
    let stream = SampleStream::main(samples);
    let (grid, _) = GridBuilder::new().build(&stream).unwrap();

    let windows = assign_windows(stream.samples(), &grid);
    let mut seen = vec![false; stream.len()];
    let mut cursor = 0;
    for window in windows.iter().flatten() {
        assert!(window.start >= cursor);
        for i in window.clone() {
            assert!(!seen[i], "sample {} assigned twice", i);
            seen[i] = true;
        }
        cursor = window.end;
    }
    assert!(windows.iter().any(|w| w.is_none()));
}

#[test]
fn test_empty_window_excluded_from_dataset() {
    let mut samples: Vec<Sample> = (0..=10).map(|i| sample(i * 4, 3, "A", 1.0)).collect();
    samples.extend((0..=10).map(|i| sample(200 + i * 4, 3, "A", 1.0)));
    let main = SampleStream::main(samples);

    let dataset = build_main_dataset(&main, &mut MemoryStatusLog::new()).unwrap();
    let metrics = dataset.metrics();
    assert!(metrics.main.empty_cells > 10);
    assert_eq!(metrics.merge.rows_kept, metrics.main.populated_cells);
    assert!(dataset.rows().iter().all(|c| c.state.stroke_id != 0));
    // No row falls into the idle gap
    assert!(dataset
        .rows()
        .iter()
        .all(|c| c.timestamp <= at(40) || c.timestamp >= at(200)));
}

// ============================================================================
// Reference Placement Tests
// ============================================================================

#[test]
fn test_reference_inside_main_window() {
    let main: Vec<Sample> = (0..=250).map(|i| sample(i * 4, 1 + i / 50, "A", i as f64)).collect();
    let reference: Vec<Sample> = main
        .iter()
        .filter(|s| s.timestamp >= at(200) && s.timestamp <= at(300))
        .cloned()
        .collect();

    let dataset = build_dataset(
        &SampleStream::main(main.clone()),
        &SampleStream::reference(reference),
        &mut MemoryStatusLog::new(),
    )
    .unwrap();

    assert_eq!(dataset.metrics().placement, Some(Placement::Contained));
    // No rows beyond the main grid
    let last = dataset.rows().last().unwrap();
    assert!(last.timestamp <= at(1000));
    assert!(dataset.rows().iter().all(|c| c.elapsed_ms <= 1000.0));
}

#[test]
fn test_reference_outside_main_window_is_retimed() {
    let main: Vec<Sample> = (0..=250).map(|i| sample(i * 4, 1, "A", 1.0)).collect();
    let reference: Vec<Sample> = (0..=25)
        .map(|i| sample(-3_600_000 + i * 4, 42, "R", i as f64))
        .collect();

    let mut log = MemoryStatusLog::new();
    let dataset = build_dataset(
        &SampleStream::main(main),
        &SampleStream::reference(reference),
        &mut log,
    )
    .unwrap();

    let Some(Placement::Appended {
        start_ms,
        period_ms,
    }) = dataset.metrics().placement
    else {
        panic!("reference should be appended");
    };
    assert_eq!(period_ms, 10.0);
    assert_eq!(start_ms, 1010.0);

    let appended: Vec<f64> = dataset
        .rows()
        .iter()
        .filter(|c| c.state.stroke_id == 42)
        .map(|c| c.elapsed_ms)
        .collect();
    assert_eq!(appended[0], 1010.0);
    for pair in appended.windows(2) {
        assert_eq!(pair[1] - pair[0], 10.0);
    }
    assert!(log.contains("outside selection"));
}

// ============================================================================
// Cycle Splicing Tests
// ============================================================================

#[test]
fn test_reference_spliced_at_each_stroke_start() {
    // Strokes 5 and 7 inside the window, reference recorded elsewhere
    let mut main: Vec<Sample> = (0..50).map(|i| sample(i * 4, 5, "A", 1.0)).collect();
    main.extend((50..100).map(|i| sample(i * 4, 7, "A", 1.0)));
    let reference: Vec<Sample> = (0..=5)
        .map(|i| sample(50_000 + i * 4, 9, "R", 100.0 + i as f64))
        .collect();

    let dataset = build_dataset(
        &SampleStream::main(main),
        &SampleStream::reference(reference),
        &mut MemoryStatusLog::new(),
    )
    .unwrap();

    let rows = dataset.rows();
    let first_five = rows.iter().position(|c| c.state.stroke_id == 5).unwrap();
    let first_seven = rows.iter().position(|c| c.state.stroke_id == 7).unwrap();
    assert_eq!(rows[first_five].reference.force_left, 100.0);
    assert_eq!(rows[first_seven].reference.force_left, 100.0);
    assert_eq!(rows[first_seven].reference.force_right, 200.0);
    // Boundaries: 5, 7 and the appended reference itself
    assert_eq!(dataset.metrics().merge.boundaries, 3);
}

// ============================================================================
// End-to-End Tests
// ============================================================================

#[test]
fn test_one_second_ramp_scenario() {
    let times = irregular_times(1000);

    // Y only ever appears as the second sample of its 10ms window
    let mut samples = Vec::with_capacity(times.len());
    let mut previous_cell = None;
    let mut position_in_cell = 0;
    for &t in &times {
        let cell = (t + 9) / 10;
        position_in_cell = if previous_cell == Some(cell) {
            position_in_cell + 1
        } else {
            0
        };
        previous_cell = Some(cell);
        let state = if position_in_cell == 1 && cell % 3 != 0 {
            "Y"
        } else {
            "X"
        };
        samples.push(sample(t, 1, state, t as f64 / 10.0));
    }
    let y_share =
        samples.iter().filter(|s| s.state.operation_state == "Y").count() as f64 / samples.len() as f64;
    assert!(y_share > 0.25 && y_share < 0.4, "Y share {}", y_share);

    let dataset = build_main_dataset(&SampleStream::main(samples), &mut MemoryStatusLog::new())
        .unwrap();

    assert_eq!(dataset.len(), 100);
    assert!(dataset.rows().iter().all(|c| c.state.operation_state == "X"));
    for pair in dataset.rows().windows(2) {
        assert!(pair[1].main.force_left >= pair[0].main.force_left);
        assert!((pair[1].main.force_left - pair[0].main.force_left) <= 2.0);
    }
}

#[test]
fn test_preparer_from_parameter_file() {
    let yaml = "
Begin: 01.03.2021 07:59:59
End: 01.03.2021 08:00:02
Operation: ''
Material: ''
ReferenceCurve: 2
";
    let request = PrepConfig::from_yaml_str(yaml).unwrap().to_request().unwrap();

    let mut samples: Vec<Sample> = (0..250).map(|i| sample(i * 4, 1 + i / 125, "A", 1.0)).collect();
    samples.reverse();
    let source = MemorySource::new(samples);

    let mut log = MemoryStatusLog::new();
    let dataset = Preparer::new(&source).run(&request, &mut log).unwrap();

    assert_eq!(dataset.metrics().placement, Some(Placement::Contained));
    assert!(log.contains("Query finished (Rows: 250"));
    assert!(log.contains("Query finished (Rows: 125"));

    let mut out = Vec::new();
    dataset.write_csv(&mut out, b';').unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().next().unwrap(), COLUMNS.join(";"));
    assert_eq!(text.lines().count(), dataset.len() + 1);
}

#[test]
fn test_missing_reference_reports_empty_stream() {
    let source = MemorySource::new((0..50).map(|i| sample(i * 4, 1, "A", 1.0)).collect());
    let request = PrepConfig::from_yaml_str(
        "Begin: 01.03.2021 07:00:00\nEnd: 01.03.2021 09:00:00\nReferenceCurve: 77\n",
    )
    .unwrap()
    .to_request()
    .unwrap();

    let mut log = MemoryStatusLog::new();
    let err = Preparer::new(&source).run(&request, &mut log).unwrap_err();
    assert!(matches!(
        err,
        PrepError::EmptyStream {
            stream: StreamKind::Reference
        }
    ));
    assert!(log.contains("No Data Found"));
}
