//! Tests for DaySource and TimeAxis behaviour.

use chrono::{TimeZone, Utc};
use profiler_common::{AltitudeAxis, DaySource, TimeAxis, VariableData};

// ============================================================================
// DaySource tests
// ============================================================================

#[test]
fn test_day_source_builder() {
    let source = DaySource::new(
        "/data/profiler_20240115.nc",
        vec![0, 900, 1800],
        AltitudeAxis::new(vec![100.0, 200.0]),
    )
    .with_sampling_interval("15 minutes")
    .with_variable(
        "wind_speed",
        VariableData::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], Some("m s-1".to_string())),
    );

    assert_eq!(source.label(), "/data/profiler_20240115.nc");
    assert_eq!(source.sampling_interval(), Some("15 minutes"));
    assert_eq!(source.sample_count(), 3);
    assert_eq!(source.altitude().len(), 2);
    assert_eq!(source.units("wind_speed"), Some("m s-1"));
    assert!(source.variable("wind_from_direction").is_none());
    assert_eq!(source.variable_names().collect::<Vec<_>>(), vec!["wind_speed"]);
}

#[test]
fn test_day_source_without_units() {
    let source = DaySource::new("mem", vec![0], AltitudeAxis::new(vec![0.0]))
        .with_variable("snr", VariableData::new(vec![1.0], None));
    assert_eq!(source.units("snr"), None);
    assert_eq!(source.sampling_interval(), None);
}

// ============================================================================
// TimeAxis tests
// ============================================================================

#[test]
fn test_time_axis_datetimes() {
    let start = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap().timestamp();
    let axis = TimeAxis::from_range(30, start, start + 3600);

    let times = axis.datetimes();
    assert_eq!(times.len(), 3);
    assert_eq!(times[0], Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
    assert_eq!(times[2], Utc.with_ymd_and_hms(2024, 1, 15, 1, 0, 0).unwrap());
    assert_eq!(axis.datetime(1), Some(Utc.with_ymd_and_hms(2024, 1, 15, 0, 30, 0).unwrap()));
    assert_eq!(axis.datetime(3), None);
}
