//! Common test fixtures for wind-profiler tests.
//!
//! Fixed reference instants keep axis-dependent assertions deterministic.

/// Reference instants in UTC.
pub mod time {
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};

    /// A mid-morning wall clock that is not on a cadence boundary.
    pub fn reference_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 44, 59).unwrap()
    }

    /// `reference_now()` floored to a 15 minute boundary.
    pub fn reference_floor_15() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    }

    /// Exactly midnight, the boundary case for day rollover.
    pub fn midnight_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
    }

    pub fn reference_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    /// Unix seconds of UTC midnight on `date`.
    pub fn midnight_ts(date: NaiveDate) -> i64 {
        Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
            .timestamp()
    }
}

/// Variable names carried by the instrument's snr-winds product.
pub mod variables {
    pub const WIND_SPEED: &str = "wind_speed";
    pub const WIND_FROM_DIRECTION: &str = "wind_from_direction";
    pub const UPWARD_AIR_VELOCITY: &str = "upward_air_velocity";
    pub const SNR_MINIMUM: &str = "signal_to_noise_ratio_minimum";
    pub const SPECTRAL_WIDTH: &str = "spectral_width_of_beam_3";

    pub const ALL: [&str; 5] = [
        WIND_SPEED,
        WIND_FROM_DIRECTION,
        UPWARD_AIR_VELOCITY,
        SNR_MINIMUM,
        SPECTRAL_WIDTH,
    ];
}

/// Typical altitude axes (metres).
pub mod altitude {
    /// A short, uneven axis like the low mode's lowest gates.
    pub const LOW_MODE_GATES: [f32; 5] = [162.0, 306.0, 450.0, 594.0, 738.0];

    /// Same length as `LOW_MODE_GATES` but shifted by a whole gate.
    pub const SHIFTED_GATES: [f32; 5] = [306.0, 450.0, 594.0, 738.0, 882.0];
}
