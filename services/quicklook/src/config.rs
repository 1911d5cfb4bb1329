//! Quick-look plotter configuration.
//!
//! Every field has a default, so an empty YAML document (or no file at all)
//! reproduces the Capel Dewi deployment. See `config/quicklook.yaml` for an
//! annotated example.

use std::path::PathBuf;

use renderer::{FigureLayout, PlotStyle, QuiverConfig};
use serde::{Deserialize, Serialize};

/// Top-level plotter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuicklookConfig {
    /// Instrument name as it appears in source file names
    pub instrument: String,

    /// Site code as it appears in source file names
    pub site: String,

    /// Product version suffix, e.g. `v1.0`
    pub version: String,

    /// Prefix of every rolling artifact name
    pub output_prefix: String,

    /// Two-line caption drawn above the first panel of rolling plots
    pub caption: Option<String>,

    /// Directory holding the daily NetCDF files
    pub data_dir: PathBuf,

    /// Directory the rolling plots are written to
    pub plots_dir: PathBuf,

    /// Source file name relative to `data_dir`
    pub source_template: String,

    /// Operating modes to plot (`low`, `high`)
    pub modes: Vec<String>,

    /// Rolling window lengths in days
    pub windows: Vec<u32>,

    /// Cadence of the empty plot drawn when no source is present
    pub fallback_cadence_minutes: u32,

    /// Artifacts written per plot
    pub formats: Vec<OutputFormat>,

    pub figure: FigureSettings,

    pub wind: WindSettings,

    /// One simple heatmap per entry
    pub variables: Vec<VariableSettings>,

    /// Stacked panels of the multipanel plot, top to bottom
    pub multipanel: Vec<VariableSettings>,

    /// Single-day plots for field deployments
    pub day: DaySettings,
}

impl Default for QuicklookConfig {
    fn default() -> Self {
        Self {
            instrument: "ncas-radar-wind-profiler-1".to_string(),
            site: "cdao".to_string(),
            version: "v1.0".to_string(),
            output_prefix: "ncas-wind-profiler-1".to_string(),
            caption: Some(
                "NCAS Radar Wind Profiler 1\nCapel Dewi Atmospheric Observatory, Wales, UK"
                    .to_string(),
            ),
            data_dir: PathBuf::from(
                "/gws/pw/j07/ncas_obs_vol1/cdao/processing/ncas-radar-wind-profiler-1/netcdf_files",
            ),
            plots_dir: PathBuf::from(
                "/gws/pw/j07/ncas_obs_vol1/cdao/public/ncas-radar-wind-profiler-1",
            ),
            source_template: "{instrument}_{site}_{date}_snr-winds_{mode}-mode_15min_{version}.nc"
                .to_string(),
            modes: vec!["low".to_string(), "high".to_string()],
            windows: vec![1, 2],
            fallback_cadence_minutes: 15,
            formats: vec![OutputFormat::Png, OutputFormat::Svg],
            figure: FigureSettings::default(),
            wind: WindSettings::default(),
            variables: vec![
                VariableSettings::new("upward_air_velocity", PlotStyle::diverging()),
                VariableSettings::new("signal_to_noise_ratio_minimum", PlotStyle::default()),
                VariableSettings::new("spectral_width_of_beam_3", PlotStyle::default()),
            ],
            multipanel: vec![
                VariableSettings::new("upward_air_velocity", PlotStyle::default()),
                VariableSettings::new("signal_to_noise_ratio_minimum", PlotStyle::default()),
                VariableSettings::new("spectral_width_of_beam_3", PlotStyle::default()),
            ],
            day: DaySettings::default(),
        }
    }
}

impl QuicklookConfig {
    /// Every variable a rolling run reads from the source files.
    pub fn rolling_variables(&self) -> Vec<&str> {
        let mut names = vec![
            self.wind.speed_variable.as_str(),
            self.wind.direction_variable.as_str(),
        ];
        for var in self.variables.iter().chain(&self.multipanel) {
            if !names.contains(&var.name.as_str()) {
                names.push(&var.name);
            }
        }
        names
    }

    /// Longest configured window, in days.
    pub fn max_window(&self) -> u32 {
        self.windows.iter().copied().max().unwrap_or(1)
    }
}

/// Artifact format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Svg,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
        }
    }
}

/// Pixel size of the rendered figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureSettings {
    pub width: u32,
    /// Height of one panel; multipanel figures stack panels vertically
    pub panel_height: u32,
    pub font_family: String,
}

impl Default for FigureSettings {
    fn default() -> Self {
        let layout = FigureLayout::default();
        Self {
            width: layout.width,
            panel_height: layout.panel_height,
            font_family: layout.font_family,
        }
    }
}

impl FigureSettings {
    pub fn layout(&self) -> FigureLayout {
        FigureLayout {
            font_family: self.font_family.clone(),
            ..FigureLayout::new(self.width, self.panel_height)
        }
    }
}

/// Wind speed heatmap with direction arrows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindSettings {
    pub speed_variable: String,
    /// Direction the wind blows from, in degrees
    pub direction_variable: String,
    /// Draw an arrow at every n-th time and altitude index
    pub arrow_interval: usize,
    /// Length arrows are normalised to before drawing
    pub arrow_length: f32,
    /// Arrow lengths per plot width
    pub arrow_scale: f32,
    pub arrow_color: String,
    pub colorbar_label: String,
    pub style: PlotStyle,
}

impl Default for WindSettings {
    fn default() -> Self {
        let quiver = QuiverConfig::default();
        Self {
            speed_variable: "wind_speed".to_string(),
            direction_variable: "wind_from_direction".to_string(),
            arrow_interval: quiver.interval,
            arrow_length: quiver.arrow_length,
            arrow_scale: quiver.scale,
            arrow_color: quiver.color,
            colorbar_label: "Wind speed (m/s)".to_string(),
            style: PlotStyle::default(),
        }
    }
}

impl WindSettings {
    pub fn quiver(&self) -> QuiverConfig {
        QuiverConfig {
            interval: self.arrow_interval,
            arrow_length: self.arrow_length,
            scale: self.arrow_scale,
            color: self.arrow_color.clone(),
            ..QuiverConfig::default()
        }
    }

    /// The same wind settings drawn with another colour style.
    pub fn with_style(&self, style: PlotStyle) -> Self {
        Self {
            style,
            ..self.clone()
        }
    }
}

/// A variable plotted as a heatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSettings {
    pub name: String,
    #[serde(default)]
    pub style: PlotStyle,
}

impl VariableSettings {
    pub fn new(name: impl Into<String>, style: PlotStyle) -> Self {
        Self {
            name: name.into(),
            style,
        }
    }
}

/// Single-day plots, one directory per date and mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaySettings {
    /// Also draw today's day plots on every rolling run
    pub enabled: bool,
    pub data_dir: PathBuf,
    pub plots_dir: PathBuf,
    pub site: String,
    /// Source file name relative to `data_dir`
    pub source_template: String,
    /// Output directory relative to `plots_dir`
    pub output_subdir: String,
    /// Averaging modes in minutes (`5`, `15`)
    pub modes: Vec<String>,
    pub wind_style: PlotStyle,
    pub variables: Vec<VariableSettings>,
}

impl Default for DaySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            data_dir: PathBuf::from(
                "/gws/pw/j07/ncas_obs_vol1/amf/processing/ncas-radar-wind-profiler-1/20230710_woest",
            ),
            plots_dir: PathBuf::from("/gws/pw/j07/woest/public/quicklooks/ncas-radar-wind-profiler-1"),
            site: "mobile".to_string(),
            source_template:
                "{year}/{month}/{instrument}_{site}_{date}_snr-winds_{mode}min_{version}.nc"
                    .to_string(),
            output_subdir: "{iso_date}/{mode}min".to_string(),
            modes: vec!["5".to_string(), "15".to_string()],
            wind_style: PlotStyle::fixed("viridis", 0.0, 25.0),
            variables: vec![
                VariableSettings::new("upward_air_velocity", PlotStyle::diverging()),
                VariableSettings::new(
                    "signal_to_noise_ratio_minimum",
                    PlotStyle::fixed("viridis", 0.0, 45.0),
                ),
            ],
        }
    }
}

impl DaySettings {
    /// Every variable a day run reads from the source file.
    pub fn variables_with_wind<'a>(&'a self, wind: &'a WindSettings) -> Vec<&'a str> {
        let mut names = vec![wind.speed_variable.as_str(), wind.direction_variable.as_str()];
        for var in &self.variables {
            if !names.contains(&var.name.as_str()) {
                names.push(&var.name);
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use renderer::RangeSpec;

    #[test]
    fn test_default_matches_deployment() {
        let config = QuicklookConfig::default();
        assert_eq!(config.modes, vec!["low", "high"]);
        assert_eq!(config.windows, vec![1, 2]);
        assert_eq!(config.max_window(), 2);
        assert_eq!(config.wind.arrow_interval, 3);
        assert_eq!(config.wind.arrow_scale, 48.0);
        assert_eq!(
            config.variables[0].style.range,
            RangeSpec::Symmetric { percentile: 98.0 }
        );
    }

    #[test]
    fn test_rolling_variables_deduplicated() {
        let config = QuicklookConfig::default();
        assert_eq!(
            config.rolling_variables(),
            vec![
                "wind_speed",
                "wind_from_direction",
                "upward_air_velocity",
                "signal_to_noise_ratio_minimum",
                "spectral_width_of_beam_3",
            ]
        );
    }

    #[test]
    fn test_day_variables_include_wind() {
        let config = QuicklookConfig::default();
        let names = config.day.variables_with_wind(&config.wind);
        assert_eq!(names.len(), 4);
        assert_eq!(names[0], "wind_speed");
        assert_eq!(names[3], "signal_to_noise_ratio_minimum");
    }

    #[test]
    fn test_quiver_from_wind_settings() {
        let wind = WindSettings {
            arrow_interval: 2,
            arrow_scale: 24.0,
            ..WindSettings::default()
        };
        let quiver = wind.quiver();
        assert_eq!(quiver.interval, 2);
        assert_eq!(quiver.scale, 24.0);
        assert_eq!(quiver.arrow_length, 1.0);
    }
}
