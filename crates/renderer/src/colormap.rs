//! Colour maps and value-range resolution for heatmaps.

use crate::error::{RenderError, RenderResult};
use crate::style::{hex_to_rgb, ColorStop};

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        hex_to_rgb(hex).map(|(r, g, b)| Self::rgb(r, g, b))
    }

    /// `#rrggbb`, alpha dropped.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Linear color interpolation
pub fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;

    Color::new(
        mix(color1.r, color2.r),
        mix(color1.g, color2.g),
        mix(color1.b, color2.b),
        mix(color1.a, color2.a),
    )
}

const VIRIDIS: [&str; 9] = [
    "#440154", "#482878", "#3e4989", "#31688e", "#26828e", "#1f9e89", "#35b779", "#6ece58",
    "#fde725",
];

// ColorBrewer RdBu, reversed so low values are blue.
const RD_BU_R: [&str; 11] = [
    "#053061", "#2166ac", "#4393c3", "#92c5de", "#d1e5f0", "#f7f7f7", "#fddbc7", "#f4a582",
    "#d6604d", "#b2182b", "#67001f",
];

/// Piecewise-linear colour map over the normalised range `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    stops: Vec<(f32, Color)>,
}

impl Colormap {
    fn evenly_spaced(hex: &[&str]) -> Self {
        let last = (hex.len() - 1).max(1) as f32;
        let stops = hex
            .iter()
            .enumerate()
            .filter_map(|(i, h)| Color::from_hex(h).map(|c| (i as f32 / last, c)))
            .collect();
        Self { stops }
    }

    pub fn viridis() -> Self {
        Self::evenly_spaced(&VIRIDIS)
    }

    /// Diverging blue-white-red, for signed quantities centred on zero.
    pub fn rd_bu_r() -> Self {
        Self::evenly_spaced(&RD_BU_R)
    }

    /// Look up a built-in map by name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "viridis" => Some(Self::viridis()),
            "rdbu_r" | "rd_bu_r" => Some(Self::rd_bu_r()),
            _ => None,
        }
    }

    /// Build from value-anchored stops. Stop values are rescaled so the
    /// lowest maps to 0 and the highest to 1.
    pub fn from_stops(stops: &[ColorStop]) -> RenderResult<Self> {
        if stops.len() < 2 {
            return Err(RenderError::InvalidStyle(
                "custom colour map needs at least two stops".to_string(),
            ));
        }

        let mut sorted = stops.to_vec();
        sorted.sort_by(|a, b| a.value.total_cmp(&b.value));
        let lo = sorted[0].value;
        let span = sorted[sorted.len() - 1].value - lo;
        if span <= 0.0 {
            return Err(RenderError::InvalidStyle(
                "custom colour map stops must span a range".to_string(),
            ));
        }

        let stops = sorted
            .iter()
            .map(|s| {
                Color::from_hex(&s.color)
                    .map(|c| ((s.value - lo) / span, c))
                    .ok_or_else(|| RenderError::InvalidStyle(format!("bad colour '{}'", s.color)))
            })
            .collect::<RenderResult<Vec<_>>>()?;

        Ok(Self { stops })
    }

    /// Colour at normalised position `t`, clamped to `[0, 1]`.
    pub fn color_at(&self, t: f32) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let Some(&(_, first)) = self.stops.first() else {
            return Color::transparent();
        };

        let mut prev = (0.0, first);
        for &(pos, color) in &self.stops {
            if t <= pos {
                let span = pos - prev.0;
                if span <= f32::EPSILON {
                    return color;
                }
                return interpolate_color(prev.1, color, (t - prev.0) / span);
            }
            prev = (pos, color);
        }
        prev.1
    }
}

/// The data interval mapped onto a colour map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorRange {
    pub min: f32,
    pub max: f32,
}

impl ColorRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Range covering the finite values, widened when degenerate.
    /// `(0, 1)` when there are none.
    pub fn from_values(values: impl IntoIterator<Item = f32>) -> Self {
        let bounds = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f32, f32)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            });

        match bounds {
            None => Self::new(0.0, 1.0),
            Some((lo, hi)) if hi - lo <= f32::EPSILON => Self::new(lo - 0.5, hi + 0.5),
            Some((lo, hi)) => Self::new(lo, hi),
        }
    }

    /// `(-b, b)` where `b` is the `pct`-th percentile of `|value|`.
    pub fn symmetric(values: impl IntoIterator<Item = f32>, pct: f32) -> Self {
        let magnitudes: Vec<f32> = values
            .into_iter()
            .filter(|v| v.is_finite())
            .map(f32::abs)
            .collect();
        let bound = percentile(&magnitudes, pct).filter(|b| *b > 0.0).unwrap_or(1.0);
        Self::new(-bound, bound)
    }

    /// Position of `value` in `[0, 1]`, clamped.
    pub fn normalize(&self, value: f32) -> f32 {
        let span = self.max - self.min;
        if span.abs() <= f32::EPSILON {
            return 0.5;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}

/// Linearly interpolated percentile (`pct` in `[0, 100]`), as numpy computes
/// it by default. `None` for an empty slice.
pub fn percentile(values: &[f32], pct: f32) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f32::total_cmp);

    let rank = (pct.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f32;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f32;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_midpoint() {
        let c = interpolate_color(Color::rgb(0, 0, 0), Color::rgb(255, 255, 255), 0.5);
        assert_eq!(c, Color::rgb(128, 128, 128));
    }

    #[test]
    fn test_viridis_endpoints() {
        let map = Colormap::viridis();
        assert_eq!(map.color_at(0.0).to_hex(), "#440154");
        assert_eq!(map.color_at(1.0).to_hex(), "#fde725");
        assert_eq!(map.color_at(2.0).to_hex(), "#fde725");
        assert_eq!(map.color_at(-1.0).to_hex(), "#440154");
    }

    #[test]
    fn test_rd_bu_r_centre_is_white() {
        assert_eq!(Colormap::rd_bu_r().color_at(0.5).to_hex(), "#f7f7f7");
    }

    #[test]
    fn test_percentile() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&values, 0.0), Some(1.0));
        assert_eq!(percentile(&values, 50.0), Some(3.0));
        assert_eq!(percentile(&values, 100.0), Some(5.0));
        assert_eq!(percentile(&values, 25.0), Some(2.0));
        assert_eq!(percentile(&[], 50.0), None);
    }
}
