//! Construction of the synthetic time axis.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Timelike, Utc};
use profiler_common::time::{MINUTES_PER_DAY, SECONDS_PER_MINUTE};
use profiler_common::{ProfilerError, ProfilerResult, TimeAxis};

const SECONDS_PER_DAY: i64 = MINUTES_PER_DAY as i64 * SECONDS_PER_MINUTE;

/// Floor `now` to the most recent multiple of `cadence_minutes` counted from
/// UTC midnight of the same day. Seconds are discarded.
pub fn latest_floor(cadence_minutes: u32, now: DateTime<Utc>) -> ProfilerResult<DateTime<Utc>> {
    if cadence_minutes == 0 {
        return Err(ProfilerError::InvalidAxis(
            "cadence must be a positive number of minutes".to_string(),
        ));
    }

    let minutes_since_midnight = now.hour() * 60 + now.minute();
    let floored = minutes_since_midnight / cadence_minutes * cadence_minutes;

    Ok(utc_midnight(now.date_naive())? + Duration::minutes(floored as i64))
}

/// Build the rolling axis `[latest_floor - window_days, latest_floor]`.
///
/// Both endpoints are included whenever the cadence divides the window, which
/// gives `window_days * 1440 / cadence + 1` entries. For cadences that do not
/// divide the window the axis still starts at `latest_floor - window_days`
/// and stops at the last step not after `latest_floor`.
pub fn build_axis(
    cadence_minutes: u32,
    window_days: u32,
    now: DateTime<Utc>,
) -> ProfilerResult<TimeAxis> {
    if window_days == 0 {
        return Err(ProfilerError::InvalidAxis(
            "window must cover at least one day".to_string(),
        ));
    }

    let end = latest_floor(cadence_minutes, now)?.timestamp();
    let start = end - window_days as i64 * SECONDS_PER_DAY;

    Ok(TimeAxis::from_range(cadence_minutes, start, end))
}

/// Build the axis for one calendar day: midnight, then every cadence step
/// strictly before the following midnight.
pub fn build_day_axis(cadence_minutes: u32, date: NaiveDate) -> ProfilerResult<TimeAxis> {
    if cadence_minutes == 0 {
        return Err(ProfilerError::InvalidAxis(
            "cadence must be a positive number of minutes".to_string(),
        ));
    }

    let start = utc_midnight(date)?.timestamp();
    Ok(TimeAxis::from_range(
        cadence_minutes,
        start,
        start + SECONDS_PER_DAY - 1,
    ))
}

fn utc_midnight(date: NaiveDate) -> ProfilerResult<DateTime<Utc>> {
    let naive = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| ProfilerError::InvalidAxis(format!("no midnight on {}", date)))?;
    Ok(Utc.from_utc_datetime(&naive))
}
