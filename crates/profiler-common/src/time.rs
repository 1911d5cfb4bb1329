//! Time axis handling for profiler grids.

use chrono::{DateTime, Utc};

/// Seconds in one minute, used to step the axis.
pub const SECONDS_PER_MINUTE: i64 = 60;

/// Minutes in one UTC day.
pub const MINUTES_PER_DAY: u32 = 1440;

/// A synthetic, gap-free sequence of sample instants.
///
/// Timestamps are integer seconds since the Unix epoch, strictly increasing
/// and spaced exactly `cadence_minutes` apart. The axis is never persisted;
/// it is rebuilt for every plot from the wall clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeAxis {
    cadence_minutes: u32,
    timestamps: Vec<i64>,
}

impl TimeAxis {
    /// Build an axis from `start` to `end` inclusive, stepping by the cadence.
    ///
    /// `end` is included only when it lies on the step; callers pass an end
    /// that is a whole number of steps past `start`.
    pub fn from_range(cadence_minutes: u32, start: i64, end: i64) -> Self {
        let step = cadence_minutes.max(1) as i64 * SECONDS_PER_MINUTE;
        let timestamps = if end < start {
            Vec::new()
        } else {
            (start..=end).step_by(step as usize).collect()
        };
        Self {
            cadence_minutes,
            timestamps,
        }
    }

    pub fn cadence_minutes(&self) -> u32 {
        self.cadence_minutes
    }

    /// Step between consecutive timestamps in seconds.
    pub fn step_seconds(&self) -> i64 {
        self.cadence_minutes as i64 * SECONDS_PER_MINUTE
    }

    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn first(&self) -> Option<i64> {
        self.timestamps.first().copied()
    }

    pub fn last(&self) -> Option<i64> {
        self.timestamps.last().copied()
    }

    /// Wall-clock instant of the axis entry at `index`.
    pub fn datetime(&self, index: usize) -> Option<DateTime<Utc>> {
        self.timestamps
            .get(index)
            .and_then(|&ts| DateTime::from_timestamp(ts, 0))
    }

    /// All axis entries as UTC instants, for the renderer.
    pub fn datetimes(&self) -> Vec<DateTime<Utc>> {
        self.timestamps
            .iter()
            .filter_map(|&ts| DateTime::from_timestamp(ts, 0))
            .collect()
    }
}

/// Parse a `sampling_interval` declaration such as `"15 minutes"`.
///
/// Only the leading whitespace-separated token is read and it must be a
/// positive integer count of minutes. Returns `None` otherwise; callers turn
/// that into a `MalformedCadence` error rather than guessing.
pub fn parse_sampling_interval(text: &str) -> Option<u32> {
    let token = text.split_whitespace().next()?;
    match token.parse::<u32>() {
        Ok(0) | Err(_) => None,
        Ok(minutes) => Some(minutes),
    }
}
