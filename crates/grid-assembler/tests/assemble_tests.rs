//! Tests for joining day sources onto the time axis.

use chrono::{Duration, NaiveDate};
use grid_assembler::{
    assemble, assemble_many, build_axis, build_day_axis, resolve_altitude, resolve_cadence,
    FALLBACK_CADENCE_MINUTES,
};
use profiler_common::{AltitudeAxis, DaySource, ProfilerError, TimeAxis, VariableData};
use test_utils::fixtures::altitude::{LOW_MODE_GATES, SHIFTED_GATES};
use test_utils::fixtures::time::{midnight_ts, reference_now};
use test_utils::fixtures::variables::{SNR_MINIMUM, WIND_FROM_DIRECTION, WIND_SPEED};
use test_utils::{patterned_day_source, uniform_day_source};

fn today() -> NaiveDate {
    reference_now().date_naive()
}

fn yesterday() -> NaiveDate {
    today() - Duration::days(1)
}

// ============================================================================
// No sources
// ============================================================================

#[test]
fn test_no_sources_gives_all_missing_default_axis() {
    let axis = build_axis(15, 1, reference_now()).unwrap();
    let sources: Vec<Option<DaySource>> = vec![None, None];

    let grid = assemble(WIND_SPEED, &axis, &sources).unwrap();
    assert_eq!(grid.shape(), (97, 9));
    assert!(grid.is_all_missing());
    assert_eq!(grid.units(), None);

    let assembly = assemble_many(&[WIND_SPEED, SNR_MINIMUM], &axis, &sources).unwrap();
    assert!(assembly.altitude_is_fallback);
    assert_eq!(assembly.altitude, AltitudeAxis::fallback());
    assert_eq!(assembly.altitude.levels()[8], 8000.0);
    assert!(assembly.is_empty());
    assert_eq!(assembly.grids.len(), 2);
}

#[test]
fn test_no_sources_uses_fallback_cadence() {
    let sources: Vec<Option<DaySource>> = vec![None, None, None];
    assert_eq!(
        resolve_cadence(&sources, FALLBACK_CADENCE_MINUTES).unwrap(),
        15
    );
    assert!(resolve_altitude(&sources).unwrap().is_none());
}

// ============================================================================
// Coverage
// ============================================================================

#[test]
fn test_full_coverage_single_day() {
    let source = patterned_day_source(today(), 15, &LOW_MODE_GATES, &[SNR_MINIMUM], 0.0);
    let axis = build_day_axis(15, today()).unwrap();

    let grid = assemble(SNR_MINIMUM, &axis, &[Some(source.clone())]).unwrap();
    assert_eq!(grid.missing_count(), 0);
    assert_eq!(grid.units(), Some("dB"));

    let expected = &source.variable(SNR_MINIMUM).unwrap().values;
    assert_eq!(grid.data(), expected.as_slice());
}

#[test]
fn test_two_full_days_cover_rolling_window() {
    let sources = vec![
        Some(uniform_day_source(yesterday(), 15, &LOW_MODE_GATES, &[(WIND_SPEED, 1.0)])),
        Some(uniform_day_source(today(), 15, &LOW_MODE_GATES, &[(WIND_SPEED, 2.0)])),
    ];
    let axis = build_axis(15, 1, reference_now()).unwrap();
    let grid = assemble(WIND_SPEED, &axis, &sources).unwrap();

    assert_eq!(grid.missing_count(), 0);
    // 10:30 yesterday .. 23:45 yesterday is 54 rows
    assert_eq!(grid.get(0, 0), Some(1.0));
    assert_eq!(grid.get(53, 0), Some(1.0));
    assert_eq!(grid.get(54, 0), Some(2.0));
    assert_eq!(grid.get(96, 4), Some(2.0));
}

#[test]
fn test_missing_day_leaves_rows_missing() {
    let sources = vec![
        None,
        Some(uniform_day_source(today(), 15, &LOW_MODE_GATES, &[(WIND_SPEED, 2.0)])),
    ];
    let axis = build_axis(15, 1, reference_now()).unwrap();
    let grid = assemble(WIND_SPEED, &axis, &sources).unwrap();

    for row in 0..54 {
        assert!(grid.row(row).iter().all(|v| v.is_nan()), "row {} should be missing", row);
    }
    for row in 54..97 {
        assert!(grid.row(row).iter().all(|&v| v == 2.0), "row {} should be filled", row);
    }
    assert_eq!(grid.missing_count(), 54 * LOW_MODE_GATES.len());
}

#[test]
fn test_fill_values_stay_missing() {
    let mut source = uniform_day_source(today(), 15, &[100.0, 200.0], &[]);
    let samples = source.sample_count();
    let mut values = vec![3.0; samples * 2];
    values[1] = f32::NAN;
    source.insert_variable(WIND_SPEED, VariableData::new(values, None));

    let axis = build_day_axis(15, today()).unwrap();
    let grid = assemble(WIND_SPEED, &axis, &[Some(source)]).unwrap();
    assert_eq!(grid.get(0, 0), Some(3.0));
    assert!(grid.is_missing(0, 1));
    assert_eq!(grid.missing_count(), 1);
}

// ============================================================================
// Join semantics
// ============================================================================

#[test]
fn test_overlap_newest_wins() {
    let older = uniform_day_source(today(), 15, &LOW_MODE_GATES, &[(WIND_SPEED, 1.0)]);
    let newer = uniform_day_source(today(), 15, &LOW_MODE_GATES, &[(WIND_SPEED, 9.0)]);
    let axis = build_day_axis(15, today()).unwrap();

    let grid = assemble(WIND_SPEED, &axis, &[Some(older), Some(newer)]).unwrap();
    assert!(grid.valid_values().all(|v| v == 9.0));
    assert_eq!(grid.missing_count(), 0);
}

#[test]
fn test_newest_missing_slot_falls_back_to_older() {
    let older = uniform_day_source(today(), 15, &[0.0], &[(WIND_SPEED, 1.0)]);
    let start = midnight_ts(today());
    // Newer source only has the first hour.
    let newer = DaySource::new("partial", vec![start, start + 900, start + 1800, start + 2700], AltitudeAxis::new(vec![0.0]))
        .with_sampling_interval("15 minutes")
        .with_variable(WIND_SPEED, VariableData::new(vec![7.0; 4], None));

    let axis = build_day_axis(15, today()).unwrap();
    let grid = assemble(WIND_SPEED, &axis, &[Some(older), Some(newer)]).unwrap();
    assert_eq!(grid.get(3, 0), Some(7.0));
    assert_eq!(grid.get(4, 0), Some(1.0));
    assert_eq!(grid.missing_count(), 0);
}

#[test]
fn test_duplicate_timestamps_last_row_wins() {
    let start = midnight_ts(today());
    let source = DaySource::new("dup", vec![start, start, start + 900], AltitudeAxis::new(vec![0.0]))
        .with_sampling_interval("15 minutes")
        .with_variable(WIND_SPEED, VariableData::new(vec![1.0, 2.0, 3.0], None));

    let axis = TimeAxis::from_range(15, start, start + 900);
    let grid = assemble(WIND_SPEED, &axis, &[Some(source)]).unwrap();
    assert_eq!(grid.get(0, 0), Some(2.0));
    assert_eq!(grid.get(1, 0), Some(3.0));
}

#[test]
fn test_off_grid_timestamps_do_not_match() {
    let start = midnight_ts(today());
    let source = DaySource::new("offset", vec![start + 1, start + 899], AltitudeAxis::new(vec![0.0]))
        .with_sampling_interval("15 minutes")
        .with_variable(WIND_SPEED, VariableData::new(vec![1.0, 2.0], None));

    let axis = TimeAxis::from_range(15, start, start + 900);
    let grid = assemble(WIND_SPEED, &axis, &[Some(source)]).unwrap();
    assert!(grid.is_all_missing());
}

#[test]
fn test_unsorted_source_rows() {
    let start = midnight_ts(today());
    let source = DaySource::new("unsorted", vec![start + 900, start], AltitudeAxis::new(vec![0.0]))
        .with_sampling_interval("15 minutes")
        .with_variable(WIND_SPEED, VariableData::new(vec![20.0, 10.0], None));

    let axis = TimeAxis::from_range(15, start, start + 900);
    let grid = assemble(WIND_SPEED, &axis, &[Some(source)]).unwrap();
    assert_eq!(grid.get(0, 0), Some(10.0));
    assert_eq!(grid.get(1, 0), Some(20.0));
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_altitude_mismatch_fails() {
    let sources = vec![
        Some(uniform_day_source(yesterday(), 15, &SHIFTED_GATES, &[(WIND_SPEED, 1.0)])),
        Some(uniform_day_source(today(), 15, &LOW_MODE_GATES, &[(WIND_SPEED, 2.0)])),
    ];
    let axis = build_axis(15, 1, reference_now()).unwrap();

    let err = assemble(WIND_SPEED, &axis, &sources).unwrap_err();
    assert!(matches!(err, ProfilerError::ShapeMismatch(_)));
    assert_eq!(err.kind(), "shape_mismatch");
}

#[test]
fn test_altitude_within_tolerance_accepted() {
    let nudged: Vec<f32> = LOW_MODE_GATES.iter().map(|v| v + 0.0004).collect();
    let sources = vec![
        Some(uniform_day_source(yesterday(), 15, &nudged, &[(WIND_SPEED, 1.0)])),
        Some(uniform_day_source(today(), 15, &LOW_MODE_GATES, &[(WIND_SPEED, 2.0)])),
    ];
    let axis = build_axis(15, 1, reference_now()).unwrap();

    let assembly = assemble_many(&[WIND_SPEED], &axis, &sources).unwrap();
    assert!(!assembly.altitude_is_fallback);
    assert_eq!(assembly.altitude.levels(), &LOW_MODE_GATES);
}

#[test]
fn test_missing_variable_fails() {
    let sources = vec![Some(uniform_day_source(today(), 15, &LOW_MODE_GATES, &[(WIND_SPEED, 1.0)]))];
    let axis = build_day_axis(15, today()).unwrap();

    let err = assemble(WIND_FROM_DIRECTION, &axis, &sources).unwrap_err();
    match err {
        ProfilerError::MissingVariable { variable, source_label } => {
            assert_eq!(variable, WIND_FROM_DIRECTION);
            assert!(source_label.contains("synthetic_"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_wrong_array_length_fails() {
    let source = DaySource::new("short", vec![0, 900], AltitudeAxis::new(vec![0.0, 1.0]))
        .with_sampling_interval("15 minutes")
        .with_variable(WIND_SPEED, VariableData::new(vec![1.0; 3], None));
    let axis = TimeAxis::from_range(15, 0, 900);

    let err = assemble(WIND_SPEED, &axis, &[Some(source)]).unwrap_err();
    assert!(matches!(err, ProfilerError::InvalidShape { expected: 4, actual: 3, .. }));
}

// ============================================================================
// Cadence resolution
// ============================================================================

#[test]
fn test_cadence_from_newest_source() {
    let sources = vec![
        Some(uniform_day_source(yesterday(), 5, &[0.0], &[])),
        Some(uniform_day_source(today(), 15, &[0.0], &[])),
        None,
    ];
    assert_eq!(resolve_cadence(&sources, 30).unwrap(), 15);
}

#[test]
fn test_malformed_cadence_is_fatal() {
    let source = DaySource::new("bad.nc", vec![0], AltitudeAxis::new(vec![0.0]))
        .with_sampling_interval("quarter-hourly");
    let err = resolve_cadence(&[Some(source)], 15).unwrap_err();
    match err {
        ProfilerError::MalformedCadence { source_label, value } => {
            assert_eq!(source_label, "bad.nc");
            assert_eq!(value, "quarter-hourly");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_malformed_older_cadence_only_warns() {
    let older = DaySource::new("old.nc", vec![0], AltitudeAxis::new(vec![0.0]))
        .with_sampling_interval("n/a");
    let newer = uniform_day_source(today(), 15, &[0.0], &[]);
    assert_eq!(resolve_cadence(&[Some(older), Some(newer)], 5).unwrap(), 15);
}
