//! Fixed-length direction arrows drawn over a heatmap.
//!
//! Arrows are expected to be pre-normalised to `arrow_length`, so every drawn
//! arrow has the same on-screen length and only shows direction.

use std::fmt::Write;

/// Configuration for quiver rendering
#[derive(Debug, Clone, PartialEq)]
pub struct QuiverConfig {
    /// Draw every `interval`-th time and altitude index, starting at 0.
    pub interval: usize,
    /// Length the (u, v) vectors were normalised to.
    pub arrow_length: f32,
    /// Arrow lengths per plot width: an arrow of `arrow_length` spans
    /// `plot_width * arrow_length / scale` pixels.
    pub scale: f32,
    /// Stroke colour (hex).
    pub color: String,
    pub line_width: f32,
}

impl Default for QuiverConfig {
    fn default() -> Self {
        Self {
            interval: 3,
            arrow_length: 1.0,
            scale: 48.0,
            color: "#000000".to_string(),
            line_width: 1.0,
        }
    }
}

impl QuiverConfig {
    /// On-screen arrow length for a plot area `plot_width` pixels wide.
    pub fn arrow_pixels(&self, plot_width: f32) -> f32 {
        if self.scale <= 0.0 {
            return 0.0;
        }
        plot_width * self.arrow_length / self.scale
    }
}

/// Grid cells that get an arrow: `(row, col)` for every `interval`-th row
/// and column, starting at index 0.
pub fn quiver_positions(rows: usize, cols: usize, interval: usize) -> Vec<(usize, usize)> {
    let step = interval.max(1);
    (0..rows)
        .step_by(step)
        .flat_map(|r| (0..cols).step_by(step).map(move |c| (r, c)))
        .collect()
}

/// SVG path data for one arrow with its tail at `(x, y)`.
///
/// `(u, v)` are eastward/northward components; screen y grows downwards.
/// Returns `None` for missing or calm vectors.
pub fn arrow_path(x: f32, y: f32, u: f32, v: f32, length_px: f32) -> Option<String> {
    if u.is_nan() || v.is_nan() || length_px <= 0.0 {
        return None;
    }
    let magnitude = u.hypot(v);
    if magnitude == 0.0 {
        return None;
    }

    let (ux, uy) = (u / magnitude, -v / magnitude);
    let (tx, ty) = (x + ux * length_px, y + uy * length_px);

    // Head: two barbs swept back 25 degrees from the tip.
    let head = length_px * 0.3;
    let (sin, cos) = 25f32.to_radians().sin_cos();
    let (bx, by) = (-ux, -uy);
    let left = (tx + head * (bx * cos - by * sin), ty + head * (bx * sin + by * cos));
    let right = (tx + head * (bx * cos + by * sin), ty + head * (-bx * sin + by * cos));

    let mut d = String::with_capacity(96);
    let _ = write!(
        d,
        "M{:.2} {:.2}L{:.2} {:.2}M{:.2} {:.2}L{:.2} {:.2}L{:.2} {:.2}",
        x, y, tx, ty, left.0, left.1, tx, ty, right.0, right.1
    );
    Some(d)
}
