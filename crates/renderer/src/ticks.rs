//! Axis tick placement and labels.

use chrono::DateTime;

/// Seconds between minor time ticks.
pub const MINOR_TICK_SECONDS: i64 = 2 * 3600;

const SECONDS_PER_DAY: i64 = 86_400;

/// One tick on the time axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeTick {
    pub timestamp: i64,
    /// Label lines, top to bottom.
    pub label: Vec<String>,
    /// Major ticks fall on UTC midnight and carry the date.
    pub major: bool,
}

/// Ticks every two hours from UTC midnight, inside `[start, end]`.
///
/// Midnight ticks are major and labelled `%H:%M` over `%Y/%m/%d`; the rest
/// are labelled `%H:%M`.
pub fn time_ticks(start: i64, end: i64) -> Vec<TimeTick> {
    if end < start {
        return Vec::new();
    }

    let first = start.div_euclid(MINOR_TICK_SECONDS) * MINOR_TICK_SECONDS;
    let first = if first < start { first + MINOR_TICK_SECONDS } else { first };

    (first..=end)
        .step_by(MINOR_TICK_SECONDS as usize)
        .filter_map(|ts| {
            let dt = DateTime::from_timestamp(ts, 0)?;
            let major = ts.rem_euclid(SECONDS_PER_DAY) == 0;
            let mut label = vec![dt.format("%H:%M").to_string()];
            if major {
                label.push(dt.format("%Y/%m/%d").to_string());
            }
            Some(TimeTick {
                timestamp: ts,
                label,
                major,
            })
        })
        .collect()
}

/// Round `raw` up to 1, 2, 2.5 or 5 times a power of ten.
pub fn nice_step(raw: f32) -> f32 {
    if !(raw > 0.0) || !raw.is_finite() {
        return 1.0;
    }
    let magnitude = 10f32.powi(raw.log10().floor() as i32);
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 2.5 {
        2.5
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Evenly spaced round values inside `[min, max]`, aiming for about
/// `target` ticks. Returns the ticks and the step.
pub fn nice_ticks(min: f32, max: f32, target: usize) -> (Vec<f32>, f32) {
    if !(max > min) || !min.is_finite() || !max.is_finite() {
        return (vec![min], 1.0);
    }

    let step = nice_step((max - min) / target.max(1) as f32);
    let start = (min / step).ceil() as i64;
    let stop = (max / step).floor() as i64;
    let ticks = (start..=stop).map(|i| i as f32 * step).collect();
    (ticks, step)
}

/// Format a tick value with just enough decimals for `step`.
pub fn format_tick(value: f32, step: f32) -> String {
    let decimals = (0..4)
        .find(|&d| {
            let scaled = step.abs() * 10f32.powi(d as i32);
            (scaled - scaled.round()).abs() < 1e-3
        })
        .unwrap_or(4);
    // Avoid "-0"
    let value = if value.abs() < step.abs() * 1e-3 { 0.0 } else { value };
    format!("{:.*}", decimals, value)
}
