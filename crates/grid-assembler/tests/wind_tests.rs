//! Tests for wind component derivation and arrow normalisation.

use grid_assembler::{
    assemble_many, build_axis, derive_wind_components, normalize_arrow, normalize_arrows,
    uv_to_speed_direction,
};
use profiler_common::{ProfileGrid, ProfilerError};
use test_utils::assert_approx_eq;
use test_utils::fixtures::time::reference_now;
use test_utils::fixtures::variables::{WIND_FROM_DIRECTION, WIND_SPEED};
use test_utils::uniform_day_source;

fn grid(name: &str, rows: usize, cols: usize, data: Vec<f32>) -> ProfileGrid {
    ProfileGrid::from_data(name, rows, cols, data).unwrap()
}

// ============================================================================
// Component derivation
// ============================================================================

#[test]
fn test_cardinal_directions() {
    // from N, E, S, W
    let speed = grid("s", 1, 4, vec![10.0; 4]);
    let dir = grid("d", 1, 4, vec![0.0, 90.0, 180.0, 270.0]);
    let wind = derive_wind_components(&speed, &dir).unwrap();

    let expected = [(0.0, -10.0), (-10.0, 0.0), (0.0, 10.0), (10.0, 0.0)];
    for (col, (eu, ev)) in expected.iter().enumerate() {
        assert_approx_eq!(wind.u.value(0, col), *eu, 1e-4);
        assert_approx_eq!(wind.v.value(0, col), *ev, 1e-4);
    }
}

#[test]
fn test_round_trip_speed_direction() {
    for &speed in &[0.5_f32, 3.0, 12.5, 40.0] {
        for step in 0..36 {
            let direction = step as f32 * 10.0;
            let s = grid("s", 1, 1, vec![speed]);
            let d = grid("d", 1, 1, vec![direction]);
            let wind = derive_wind_components(&s, &d).unwrap();

            let (s2, d2) = uv_to_speed_direction(wind.u.value(0, 0), wind.v.value(0, 0));
            assert_approx_eq!(s2, speed, 1e-3);
            let diff = (d2 - direction).rem_euclid(360.0);
            assert!(
                diff < 1e-2 || diff > 360.0 - 1e-2,
                "direction {} came back as {}",
                direction,
                d2
            );
        }
    }
}

#[test]
fn test_missing_propagates() {
    let speed = grid("s", 1, 3, vec![f32::NAN, 5.0, 5.0]);
    let dir = grid("d", 1, 3, vec![90.0, f32::NAN, 90.0]);
    let wind = derive_wind_components(&speed, &dir).unwrap();

    assert!(wind.u.is_missing(0, 0) && wind.v.is_missing(0, 0));
    assert!(wind.u.is_missing(0, 1) && wind.v.is_missing(0, 1));
    assert!(!wind.u.is_missing(0, 2));
}

#[test]
fn test_shape_mismatch_rejected() {
    let speed = ProfileGrid::missing("s", 2, 3);
    let dir = ProfileGrid::missing("d", 3, 2);
    assert!(matches!(
        derive_wind_components(&speed, &dir),
        Err(ProfilerError::ShapeMismatch(_))
    ));
}

#[test]
fn test_components_keep_speed_units() {
    let speed = grid("s", 1, 1, vec![1.0]).with_units(Some("m s-1".into()));
    let dir = grid("d", 1, 1, vec![45.0]).with_units(Some("degree".into()));
    let wind = derive_wind_components(&speed, &dir).unwrap();
    assert_eq!(wind.u.units(), Some("m s-1"));
    assert_eq!(wind.v.units(), Some("m s-1"));
}

#[test]
fn test_easterly_day_scenario() {
    // One day at 15 minutes, constant 5 m/s from the east.
    let now = reference_now();
    let today = now.date_naive();
    let yesterday = today - chrono::Duration::days(1);
    let altitude = [100.0, 200.0, 300.0];
    let sources = vec![
        Some(uniform_day_source(yesterday, 15, &altitude, &[(WIND_SPEED, 5.0), (WIND_FROM_DIRECTION, 90.0)])),
        Some(uniform_day_source(today, 15, &altitude, &[(WIND_SPEED, 5.0), (WIND_FROM_DIRECTION, 90.0)])),
    ];
    let axis = build_axis(15, 1, now).unwrap();
    let assembly = assemble_many(&[WIND_SPEED, WIND_FROM_DIRECTION], &axis, &sources).unwrap();

    let wind = derive_wind_components(
        assembly.grid(WIND_SPEED).unwrap(),
        assembly.grid(WIND_FROM_DIRECTION).unwrap(),
    )
    .unwrap();

    assert_eq!(wind.shape(), (97, 3));
    for &u in wind.u.data() {
        assert_approx_eq!(u, -5.0, 1e-5);
    }
    for &v in wind.v.data() {
        assert_approx_eq!(v, 0.0, 1e-5);
    }
}

// ============================================================================
// Arrow normalisation
// ============================================================================

#[test]
fn test_normalized_length_and_direction() {
    let cases = [(3.0_f32, 4.0_f32), (-3.0, 4.0), (1.0, -1.0), (-0.2, -7.0), (10.0, 0.5)];
    for &(u, v) in &cases {
        let (u1, v1) = normalize_arrow(u, v, 2.0);
        assert_approx_eq!(u1.hypot(v1), 2.0, 1e-5);
        assert_eq!(v1.signum(), v.signum(), "sign of v for ({}, {})", u, v);
        assert_approx_eq!(u1 / v1, u / v, 1e-3);
    }
}

#[test]
fn test_normalized_zonal_and_calm() {
    assert_eq!(normalize_arrow(5.0, 0.0, 1.0), (1.0, 0.0));
    assert_eq!(normalize_arrow(-0.1, 0.0, 1.0), (-1.0, 0.0));
    assert_eq!(normalize_arrow(0.0, 0.0, 1.0), (0.0, 0.0));
}

#[test]
fn test_normalized_never_infinite() {
    for &(u, v) in &[(1e-30_f32, 1e-30_f32), (3e38, 3e38), (0.0, 1e-40), (-1e-40, 0.0)] {
        let (u1, v1) = normalize_arrow(u, v, 1.0);
        assert!(u1.is_finite() && v1.is_finite(), "({}, {}) -> ({}, {})", u, v, u1, v1);
    }
}

#[test]
fn test_normalize_arrows_grid() {
    let speed = grid("s", 2, 2, vec![10.0, 0.0, f32::NAN, 2.0]);
    let dir = grid("d", 2, 2, vec![45.0, 90.0, 0.0, 270.0]);
    let wind = derive_wind_components(&speed, &dir).unwrap();

    let arrows = normalize_arrows(&wind, 1.0);
    assert_approx_eq!(arrows.u.value(0, 0).hypot(arrows.v.value(0, 0)), 1.0, 1e-5);
    // calm cell: no arrow
    assert_approx_eq!(arrows.u.value(0, 1).abs(), 0.0, 1e-6);
    assert_approx_eq!(arrows.v.value(0, 1).abs(), 0.0, 1e-6);
    assert!(arrows.u.is_missing(1, 0));
    assert_approx_eq!(arrows.u.value(1, 1), 1.0, 1e-5);

    let again = wind.normalized(1.0);
    assert_eq!(again.u.value(1, 1), arrows.u.value(1, 1));
    assert_eq!(again.u.missing_count(), arrows.u.missing_count());
}
