//! Style configuration for profiler heatmaps.
//!
//! Styles are plain serde structs so they can sit inside the service's YAML
//! configuration:
//!
//! ```yaml
//! colormap: rdbu_r
//! range:
//!   type: symmetric
//!   percentile: 98
//! ```

use serde::{Deserialize, Serialize};

use crate::colormap::{ColorRange, Colormap};
use crate::error::{RenderError, RenderResult};

/// How the colour scale's data interval is chosen.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RangeSpec {
    /// Data minimum to data maximum.
    Auto,
    /// A fixed interval, values outside are clamped.
    Fixed { min: f32, max: f32 },
    /// Zero-centred, `+/-` the given percentile of absolute values.
    Symmetric {
        #[serde(default = "default_percentile")]
        percentile: f32,
    },
}

fn default_percentile() -> f32 {
    98.0
}

impl Default for RangeSpec {
    fn default() -> Self {
        RangeSpec::Auto
    }
}

impl RangeSpec {
    /// Resolve against the non-missing values of a grid.
    pub fn resolve(&self, values: impl IntoIterator<Item = f32>) -> ColorRange {
        match *self {
            RangeSpec::Auto => ColorRange::from_values(values),
            RangeSpec::Fixed { min, max } => ColorRange::new(min, max),
            RangeSpec::Symmetric { percentile } => ColorRange::symmetric(values, percentile),
        }
    }
}

/// Color stop for a custom colour map
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ColorStop {
    pub value: f32,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Colour map plus range for one plotted variable.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlotStyle {
    /// Built-in map name (`viridis`, `rdbu_r`), ignored when `stops` is set.
    #[serde(default = "default_colormap")]
    pub colormap: String,
    #[serde(default)]
    pub range: RangeSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stops: Option<Vec<ColorStop>>,
}

fn default_colormap() -> String {
    "viridis".to_string()
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            colormap: default_colormap(),
            range: RangeSpec::Auto,
            stops: None,
        }
    }
}

impl PlotStyle {
    pub fn new(colormap: impl Into<String>, range: RangeSpec) -> Self {
        Self {
            colormap: colormap.into(),
            range,
            stops: None,
        }
    }

    /// Zero-centred diverging style used for vertical velocity.
    pub fn diverging() -> Self {
        Self::new("rdbu_r", RangeSpec::Symmetric { percentile: 98.0 })
    }

    pub fn fixed(colormap: impl Into<String>, min: f32, max: f32) -> Self {
        Self::new(colormap, RangeSpec::Fixed { min, max })
    }

    pub fn build_colormap(&self) -> RenderResult<Colormap> {
        match &self.stops {
            Some(stops) => Colormap::from_stops(stops),
            None => Colormap::by_name(&self.colormap).ok_or_else(|| {
                RenderError::InvalidStyle(format!("unknown colour map '{}'", self.colormap))
            }),
        }
    }

    /// Check the style can be built, without rendering anything.
    pub fn validate(&self) -> RenderResult<()> {
        self.build_colormap()?;
        if let RangeSpec::Fixed { min, max } = self.range {
            if !(min < max) {
                return Err(RenderError::InvalidStyle(format!(
                    "fixed range min {} must be below max {}",
                    min, max
                )));
            }
        }
        if let RangeSpec::Symmetric { percentile } = self.range {
            if !(0.0..=100.0).contains(&percentile) {
                return Err(RenderError::InvalidStyle(format!(
                    "percentile {} outside 0..=100",
                    percentile
                )));
            }
        }
        Ok(())
    }
}

/// Parse hex color string to RGB
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}
