//! Test data generators for synthetic wind-profiler day sources.
//!
//! Values follow predictable patterns so a test can tell which source, which
//! sample row and which altitude level a grid cell came from.

use chrono::NaiveDate;
use profiler_common::{AltitudeAxis, DaySource, VariableData};

use crate::fixtures::time::midnight_ts;

/// Timestamps covering one whole UTC day at `cadence_minutes`.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use test_utils::day_timestamps;
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// let ts = day_timestamps(date, 15);
/// assert_eq!(ts.len(), 96);
/// assert_eq!(ts[1] - ts[0], 900);
/// ```
pub fn day_timestamps(date: NaiveDate, cadence_minutes: u32) -> Vec<i64> {
    let start = midnight_ts(date);
    let step = cadence_minutes as i64 * 60;
    (0..(1440 / cadence_minutes) as i64)
        .map(|i| start + i * step)
        .collect()
}

/// A (samples x levels) array where each cell is `base + row * 100 + col`.
///
/// # Example
///
/// ```
/// use test_utils::create_profile_values;
///
/// let values = create_profile_values(3, 4, 1000.0);
/// assert_eq!(values.len(), 12);
/// assert_eq!(values[0], 1000.0);  // row 0, level 0
/// assert_eq!(values[5], 1101.0);  // row 1, level 1
/// ```
pub fn create_profile_values(samples: usize, levels: usize, base: f32) -> Vec<f32> {
    let mut data = Vec::with_capacity(samples * levels);
    for row in 0..samples {
        for col in 0..levels {
            data.push(base + (row * 100 + col) as f32);
        }
    }
    data
}

/// A (samples x levels) array filled with one value.
pub fn create_constant_values(samples: usize, levels: usize, value: f32) -> Vec<f32> {
    vec![value; samples * levels]
}

/// A constant array with `NaN` at the given `(row, level)` positions.
pub fn create_values_with_gaps(
    samples: usize,
    levels: usize,
    value: f32,
    gaps: &[(usize, usize)],
) -> Vec<f32> {
    let mut data = create_constant_values(samples, levels, value);
    for &(row, col) in gaps {
        if row < samples && col < levels {
            data[row * levels + col] = f32::NAN;
        }
    }
    data
}

/// A full-coverage day where every variable holds a constant value.
///
/// The source declares `"<cadence> minutes"` as its sampling interval and
/// uses the path-like label `synthetic_<YYYYMMDD>.nc`.
pub fn uniform_day_source(
    date: NaiveDate,
    cadence_minutes: u32,
    altitude: &[f32],
    variables: &[(&str, f32)],
) -> DaySource {
    let timestamps = day_timestamps(date, cadence_minutes);
    let samples = timestamps.len();
    let mut source = DaySource::new(
        format!("synthetic_{}.nc", date.format("%Y%m%d")),
        timestamps,
        AltitudeAxis::new(altitude.to_vec()),
    )
    .with_sampling_interval(format!("{} minutes", cadence_minutes));

    for &(name, value) in variables {
        source.insert_variable(
            name,
            VariableData::new(
                create_constant_values(samples, altitude.len(), value),
                Some(units_for(name).to_string()),
            ),
        );
    }
    source
}

/// A full-coverage day where each variable follows
/// [`create_profile_values`] starting at `base`.
pub fn patterned_day_source(
    date: NaiveDate,
    cadence_minutes: u32,
    altitude: &[f32],
    variables: &[&str],
    base: f32,
) -> DaySource {
    let timestamps = day_timestamps(date, cadence_minutes);
    let samples = timestamps.len();
    let mut source = DaySource::new(
        format!("patterned_{}.nc", date.format("%Y%m%d")),
        timestamps,
        AltitudeAxis::new(altitude.to_vec()),
    )
    .with_sampling_interval(format!("{} minutes", cadence_minutes));

    for &name in variables {
        source.insert_variable(
            name,
            VariableData::new(
                create_profile_values(samples, altitude.len(), base),
                Some(units_for(name).to_string()),
            ),
        );
    }
    source
}

/// Units the instrument files declare for the common variables.
pub fn units_for(variable: &str) -> &'static str {
    match variable {
        "wind_speed" | "upward_air_velocity" | "spectral_width_of_beam_3" => "m s-1",
        "wind_from_direction" => "degree",
        v if v.starts_with("signal_to_noise") => "dB",
        _ => "1",
    }
}

/// Creates RGBA pixel data for a simple gradient test pattern.
pub fn create_test_rgba_pixels(width: usize, height: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let r = ((x as f32 / width as f32) * 255.0) as u8;
            let g = ((y as f32 / height as f32) * 255.0) as u8;
            pixels.extend_from_slice(&[r, g, 128, 255]);
        }
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_day_timestamps_cover_day() {
        let ts = day_timestamps(date(), 5);
        assert_eq!(ts.len(), 288);
        assert_eq!(ts[0], midnight_ts(date()));
        assert_eq!(*ts.last().unwrap(), midnight_ts(date()) + 86_400 - 300);
    }

    #[test]
    fn test_create_values_with_gaps() {
        let values = create_values_with_gaps(3, 2, 1.0, &[(1, 1), (9, 9)]);
        assert!(values[3].is_nan());
        assert_eq!(values.iter().filter(|v| v.is_nan()).count(), 1);
    }

    #[test]
    fn test_uniform_day_source() {
        let source = uniform_day_source(date(), 15, &[100.0, 200.0], &[("wind_speed", 5.0)]);
        assert_eq!(source.sample_count(), 96);
        assert_eq!(source.sampling_interval(), Some("15 minutes"));
        assert_eq!(source.units("wind_speed"), Some("m s-1"));
        let data = source.variable("wind_speed").unwrap();
        assert_eq!(data.values.len(), 192);
        assert!(data.values.iter().all(|&v| v == 5.0));
    }

    #[test]
    fn test_patterned_day_source() {
        let source = patterned_day_source(date(), 15, &[0.0, 1.0, 2.0], &["signal_to_noise_ratio_minimum"], 0.0);
        let data = source.variable("signal_to_noise_ratio_minimum").unwrap();
        assert_eq!(data.values[2 * 3 + 1], 201.0);
        assert_eq!(source.units("signal_to_noise_ratio_minimum"), Some("dB"));
    }
}
