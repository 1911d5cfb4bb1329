//! Tests for source path templates and artifact names.

use chrono::NaiveDate;
use quicklook::naming::{check_template, day_title, window_hours};
use quicklook::{
    day_artifact_name, expand_template, rolling_artifact_name, window_title, NamingError,
    Product, QuicklookConfig, TemplateContext,
};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
}

// ============================================================================
// Templates
// ============================================================================

#[test]
fn test_default_rolling_template() {
    let config = QuicklookConfig::default();
    let ctx = TemplateContext {
        instrument: &config.instrument,
        site: &config.site,
        version: &config.version,
        mode: "low",
        date: date(),
    };

    assert_eq!(
        expand_template(&config.source_template, &ctx).unwrap(),
        "ncas-radar-wind-profiler-1_cdao_20240115_snr-winds_low-mode_15min_v1.0.nc"
    );
}

#[test]
fn test_default_day_template() {
    let config = QuicklookConfig::default();
    let ctx = TemplateContext {
        instrument: &config.instrument,
        site: &config.day.site,
        version: &config.version,
        mode: "15",
        date: date(),
    };

    assert_eq!(
        expand_template(&config.day.source_template, &ctx).unwrap(),
        "2024/01/ncas-radar-wind-profiler-1_mobile_20240115_snr-winds_15min_v1.0.nc"
    );
    assert_eq!(
        expand_template(&config.day.output_subdir, &ctx).unwrap(),
        "2024-01-15/15min"
    );
}

#[test]
fn test_unknown_placeholder() {
    assert_eq!(
        check_template("{instrument}_{station}.nc"),
        Err(NamingError::UnknownPlaceholder {
            placeholder: "station".to_string(),
            template: "{instrument}_{station}.nc".to_string(),
        })
    );
    assert!(check_template("{year}/{month}/{day}/{iso_date}_{mode}_{site}_{version}.nc").is_ok());
}

// ============================================================================
// Artifact names
// ============================================================================

#[test]
fn test_rolling_artifact_names() {
    let prefix = "ncas-wind-profiler-1";
    assert_eq!(
        rolling_artifact_name(prefix, "low", &Product::Wind, 1),
        "ncas-wind-profiler-1_low-mode_wind-speed-direction_last-24-hours"
    );
    assert_eq!(
        rolling_artifact_name(prefix, "high", &Product::Multipanel, 2),
        "ncas-wind-profiler-1_high-mode_multipanel_last-48-hours"
    );
    assert_eq!(
        rolling_artifact_name(
            prefix,
            "low",
            &Product::Variable("Spectral_Width_Of_Beam_3".to_string()),
            2
        ),
        "ncas-wind-profiler-1_low-mode_spectral_width_of_beam_3_last-48-hours"
    );
}

#[test]
fn test_day_artifact_names() {
    assert_eq!(day_artifact_name(&Product::Wind), "horizontal_winds");
    assert_eq!(
        day_artifact_name(&Product::Variable("upward_air_velocity".to_string())),
        "upward_wind"
    );
    assert_eq!(
        day_artifact_name(&Product::Variable("signal_to_noise_ratio_minimum".to_string())),
        "snr"
    );
    assert_eq!(
        day_artifact_name(&Product::Variable("spectral_width_of_beam_3".to_string())),
        "spectral_width_of_beam_3"
    );
}

#[test]
fn test_titles() {
    assert_eq!(window_hours(3), 72);
    assert_eq!(window_title(1), "Last 24 hours");
    assert_eq!(window_title(2), "Last 48 hours");
    assert_eq!(
        day_title(&Product::Wind, date()),
        "Wind speed and direction - 2024-01-15"
    );
    assert_eq!(
        day_title(&Product::Variable("upward_air_velocity".to_string()), date()),
        "upward_air_velocity - 2024-01-15"
    );
    assert_eq!(
        day_title(&Product::Multipanel, date()),
        "multipanel - 2024-01-15"
    );
}
