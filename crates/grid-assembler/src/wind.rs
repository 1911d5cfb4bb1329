//! Wind vector derivation from speed/direction grids.
//!
//! Directions follow the meteorological "from" convention: 0 degrees is wind
//! blowing from the north, 90 degrees from the east. The derived (u, v)
//! point where the air is going.

use profiler_common::{ProfileGrid, ProfilerError, ProfilerResult};

/// Eastward (`u`) and northward (`v`) wind component grids.
#[derive(Debug, Clone, PartialEq)]
pub struct WindComponents {
    pub u: ProfileGrid,
    pub v: ProfileGrid,
}

impl WindComponents {
    pub fn shape(&self) -> (usize, usize) {
        self.u.shape()
    }

    /// Rescale every vector to `arrow_length`, see [`normalize_arrow`].
    pub fn normalized(&self, arrow_length: f32) -> WindComponents {
        normalize_arrows(self, arrow_length)
    }
}

/// Derive `u = -s*sin(d)`, `v = -s*cos(d)` cell by cell.
///
/// A cell missing in either input is missing in both outputs.
pub fn derive_wind_components(
    speed: &ProfileGrid,
    direction_from: &ProfileGrid,
) -> ProfilerResult<WindComponents> {
    if speed.shape() != direction_from.shape() {
        return Err(ProfilerError::ShapeMismatch(format!(
            "{} is {:?} but {} is {:?}",
            speed.name(),
            speed.shape(),
            direction_from.name(),
            direction_from.shape()
        )));
    }

    let (rows, cols) = speed.shape();
    let (u, v): (Vec<f32>, Vec<f32>) = speed
        .data()
        .iter()
        .zip(direction_from.data())
        .map(|(&s, &d)| {
            if s.is_nan() || d.is_nan() {
                return (f32::NAN, f32::NAN);
            }
            let rad = d.to_radians();
            (-s * rad.sin(), -s * rad.cos())
        })
        .unzip();

    let units = speed.units().map(str::to_string);
    let u = ProfileGrid::from_data("eastward_wind", rows, cols, u)
        .ok_or_else(|| ProfilerError::ShapeMismatch("u component length".to_string()))?
        .with_units(units.clone());
    let v = ProfileGrid::from_data("northward_wind", rows, cols, v)
        .ok_or_else(|| ProfilerError::ShapeMismatch("v component length".to_string()))?
        .with_units(units);

    Ok(WindComponents { u, v })
}

/// Scale `(u, v)` to length `arrow_length`, keeping its direction.
///
/// The result satisfies `u1^2 + v1^2 = L^2` with the same sign of `v` and the
/// same `u/v` ratio. A purely zonal vector (`v == 0`) gives `(L*sign(u), 0)`.
/// A calm cell gives `(0, 0)`, which draws no arrow. `NaN` input stays `NaN`.
pub fn normalize_arrow(u: f32, v: f32, arrow_length: f32) -> (f32, f32) {
    if u.is_nan() || v.is_nan() {
        return (f32::NAN, f32::NAN);
    }
    if u == 0.0 && v == 0.0 {
        return (0.0, 0.0);
    }
    if v == 0.0 {
        return (arrow_length * u.signum(), 0.0);
    }

    // f64 keeps subnormal magnitudes from overflowing the scale factor.
    let (u, v) = (u as f64, v as f64);
    let scale = arrow_length as f64 / u.hypot(v);
    ((u * scale) as f32, (v * scale) as f32)
}

/// Apply [`normalize_arrow`] to every cell.
pub fn normalize_arrows(components: &WindComponents, arrow_length: f32) -> WindComponents {
    let (rows, cols) = components.shape();
    let (u, v): (Vec<f32>, Vec<f32>) = components
        .u
        .data()
        .iter()
        .zip(components.v.data())
        .map(|(&u, &v)| normalize_arrow(u, v, arrow_length))
        .unzip();

    let rebuild = |grid: &ProfileGrid, data: Vec<f32>| {
        let mut out = ProfileGrid::missing(grid.name(), rows, cols)
            .with_units(grid.units().map(str::to_string));
        for r in 0..rows {
            out.set_row(r, &data[r * cols..(r + 1) * cols]);
        }
        out
    };

    WindComponents {
        u: rebuild(&components.u, u),
        v: rebuild(&components.v, v),
    }
}

/// Invert the component derivation: `(speed, direction_from)` in degrees
/// `[0, 360)`.
pub fn uv_to_speed_direction(u: f32, v: f32) -> (f32, f32) {
    let speed = u.hypot(v);
    let direction = (-u).atan2(-v).to_degrees();
    (speed, direction.rem_euclid(360.0))
}
