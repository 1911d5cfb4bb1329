//! Figure rendering for wind-profiler quick-looks.
//!
//! - [`colormap`] / [`style`]: colour maps and how their data range is chosen
//! - [`ticks`]: time and value axis ticks
//! - [`quiver`]: fixed-length direction arrows
//! - [`figure`]: SVG composition of stacked heatmap panels
//! - [`raster`] / [`png`]: SVG rasterisation and PNG encoding
//!
//! ```no_run
//! use profiler_common::{AltitudeAxis, ProfileGrid, TimeAxis};
//! use renderer::{Figure, Panel, PlotStyle, Rasterizer};
//!
//! let axis = TimeAxis::from_range(15, 0, 86_400);
//! let altitude = AltitudeAxis::fallback();
//! let grid = ProfileGrid::missing("wind_speed", axis.len(), altitude.len());
//!
//! let figure = Figure::new(&axis, &altitude)
//!     .with_panel(Panel::new(&grid, PlotStyle::default()).with_title("Last 24 hours"));
//! let rendered = Rasterizer::new().render_figure(&figure).unwrap();
//! assert!(rendered.svg.starts_with("<svg"));
//! ```

pub mod colormap;
pub mod error;
pub mod figure;
pub mod png;
pub mod quiver;
pub mod raster;
pub mod style;
pub mod ticks;

pub use colormap::{Color, ColorRange, Colormap};
pub use error::{RenderError, RenderResult};
pub use figure::{colorbar_label, Figure, FigureLayout, Panel, QuiverLayer};
pub use quiver::QuiverConfig;
pub use raster::{RasterImage, Rasterizer, RenderedFigure};
pub use style::{ColorStop, PlotStyle, RangeSpec};
