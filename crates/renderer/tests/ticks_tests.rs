//! Tests for axis ticks.

use renderer::ticks::{format_tick, nice_ticks, time_ticks, MINOR_TICK_SECONDS};
use test_utils::fixtures::time::{midnight_ts, reference_date, reference_floor_15};

// ============================================================================
// Time axis
// ============================================================================

#[test]
fn test_last_24_hours_ticks() {
    let end = reference_floor_15().timestamp();
    let ticks = time_ticks(end - 86_400, end);

    // 12:00 yesterday through 10:00 today
    assert_eq!(ticks.len(), 12);
    assert_eq!(ticks[0].label, vec!["12:00".to_string()]);
    assert!(ticks.windows(2).all(|w| w[1].timestamp - w[0].timestamp == MINOR_TICK_SECONDS));

    let majors: Vec<_> = ticks.iter().filter(|t| t.major).collect();
    assert_eq!(majors.len(), 1);
    assert_eq!(majors[0].timestamp, midnight_ts(reference_date()));
    assert_eq!(majors[0].label, vec!["00:00".to_string(), "2024/01/15".to_string()]);
}

#[test]
fn test_day_axis_ticks_start_at_midnight() {
    let start = midnight_ts(reference_date());
    let ticks = time_ticks(start, start + 86_399);
    assert_eq!(ticks.len(), 12);
    assert!(ticks[0].major);
    assert_eq!(ticks[11].label, vec!["22:00".to_string()]);
}

#[test]
fn test_inverted_range_has_no_ticks() {
    assert!(time_ticks(100, 0).is_empty());
}

// ============================================================================
// Value axis
// ============================================================================

#[test]
fn test_altitude_ticks() {
    let (ticks, step) = nice_ticks(-500.0, 8500.0, 8);
    assert_eq!(step, 2000.0);
    assert_eq!(ticks, vec![0.0, 2000.0, 4000.0, 6000.0, 8000.0]);
}

#[test]
fn test_fractional_ticks() {
    let (ticks, step) = nice_ticks(-1.2, 1.2, 6);
    assert_eq!(step, 0.5);
    assert_eq!(ticks.len(), 5);
    assert_eq!(format_tick(ticks[0], step), "-1.0");
    assert_eq!(format_tick(ticks[2], step), "0.0");
}

#[test]
fn test_format_tick_decimals() {
    assert_eq!(format_tick(2000.0, 1000.0), "2000");
    assert_eq!(format_tick(2.5, 2.5), "2.5");
    assert_eq!(format_tick(0.25, 0.25), "0.25");
}

#[test]
fn test_degenerate_value_range() {
    let (ticks, _) = nice_ticks(3.0, 3.0, 5);
    assert_eq!(ticks, vec![3.0]);
}
