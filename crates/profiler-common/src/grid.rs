//! Altitude axes and assembled time x altitude grids.

use serde::{Deserialize, Serialize};

/// Number of levels on the fallback altitude axis.
pub const DEFAULT_LEVEL_COUNT: usize = 9;

/// Top of the fallback altitude axis in metres.
pub const DEFAULT_TOP_ALTITUDE_M: f32 = 8000.0;

/// Ordered altitude levels (metres) forming the second grid dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AltitudeAxis {
    levels: Vec<f32>,
}

impl AltitudeAxis {
    pub fn new(levels: Vec<f32>) -> Self {
        Self { levels }
    }

    /// Fallback axis used only so an empty plot still has something to draw
    /// against: 9 evenly spaced levels from 0 to 8000 m.
    pub fn fallback() -> Self {
        let step = DEFAULT_TOP_ALTITUDE_M / (DEFAULT_LEVEL_COUNT - 1) as f32;
        Self {
            levels: (0..DEFAULT_LEVEL_COUNT).map(|i| i as f32 * step).collect(),
        }
    }

    pub fn levels(&self) -> &[f32] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// True when both axes have the same length and every level agrees
    /// within `tolerance` metres.
    pub fn matches(&self, other: &AltitudeAxis, tolerance: f32) -> bool {
        self.levels.len() == other.levels.len()
            && self
                .levels
                .iter()
                .zip(&other.levels)
                .all(|(a, b)| (a - b).abs() <= tolerance || (a.is_nan() && b.is_nan()))
    }
}

/// One variable assembled onto a time axis x altitude axis.
///
/// Stored row-major: row `i` is time axis entry `i`, column `j` is altitude
/// level `j`. Missing cells hold `NaN`, which is what the renderer skips.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileGrid {
    name: String,
    units: Option<String>,
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl ProfileGrid {
    /// An entirely missing grid.
    pub fn missing(name: impl Into<String>, rows: usize, cols: usize) -> Self {
        Self {
            name: name.into(),
            units: None,
            rows,
            cols,
            data: vec![f32::NAN; rows * cols],
        }
    }

    /// Wrap existing row-major data. Returns `None` if the length is wrong.
    pub fn from_data(
        name: impl Into<String>,
        rows: usize,
        cols: usize,
        data: Vec<f32>,
    ) -> Option<Self> {
        if data.len() != rows * cols {
            return None;
        }
        Some(Self {
            name: name.into(),
            units: None,
            rows,
            cols,
            data,
        })
    }

    pub fn with_units(mut self, units: Option<String>) -> Self {
        self.units = units;
        self
    }

    pub fn set_units(&mut self, units: Option<String>) {
        self.units = units;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Raw cell value, `NaN` when missing.
    pub fn value(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.cols + col]
    }

    /// Cell value, `None` when missing or out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let v = self.data[row * self.cols + col];
        (!v.is_nan()).then_some(v)
    }

    pub fn row(&self, row: usize) -> &[f32] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Overwrite one time row. `values` must have `cols` entries.
    pub fn set_row(&mut self, row: usize, values: &[f32]) {
        let start = row * self.cols;
        self.data[start..start + self.cols].copy_from_slice(values);
    }

    pub fn is_missing(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_none()
    }

    pub fn missing_count(&self) -> usize {
        self.data.iter().filter(|v| v.is_nan()).count()
    }

    pub fn is_all_missing(&self) -> bool {
        self.data.iter().all(|v| v.is_nan())
    }

    /// Non-missing values in row-major order.
    pub fn valid_values(&self) -> impl Iterator<Item = f32> + '_ {
        self.data.iter().copied().filter(|v| !v.is_nan())
    }

    /// Smallest and largest non-missing value.
    pub fn value_range(&self) -> Option<(f32, f32)> {
        self.valid_values()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
