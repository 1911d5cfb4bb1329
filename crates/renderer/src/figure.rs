//! SVG composition of time-altitude heatmap figures.
//!
//! A [`Figure`] stacks one or more [`Panel`]s that share a time axis and an
//! altitude axis. Each panel is a nearest-shaded cell mesh (cell edges sit
//! halfway between neighbouring axis points) with a colour bar on the right,
//! optionally overlaid with fixed-length wind arrows.
//!
//! The SVG is the vector artifact; [`crate::raster`] turns the same document
//! into a PNG.

use std::fmt::Write;

use profiler_common::{AltitudeAxis, ProfileGrid, TimeAxis};
use tracing::debug;

use crate::colormap::{ColorRange, Colormap};
use crate::error::{RenderError, RenderResult};
use crate::quiver::{arrow_path, quiver_positions, QuiverConfig};
use crate::style::PlotStyle;
use crate::ticks::{format_tick, nice_ticks, time_ticks};

/// Half height (metres) given to a lone altitude level.
const LONE_LEVEL_HALF_HEIGHT_M: f64 = 50.0;

const MARGIN_LEFT: f64 = 140.0;
const MARGIN_RIGHT: f64 = 270.0;
const MARGIN_TOP: f64 = 110.0;
const MARGIN_BOTTOM: f64 = 120.0;

const COLORBAR_GAP: f64 = 40.0;
const COLORBAR_WIDTH: f64 = 36.0;
const COLORBAR_BANDS: usize = 128;

// Point sizes at 100 dpi.
const TITLE_PX: f64 = 26.0;
const AXIS_LABEL_PX: f64 = 24.0;
const TICK_LABEL_PX: f64 = 19.0;
const COLORBAR_TICK_PX: f64 = 17.0;
const CAPTION_PX: f64 = 17.0;

const GRID_COLOR: &str = "#b0b0b0";

/// Pixel geometry of a figure.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureLayout {
    pub width: u32,
    /// Height of each stacked panel.
    pub panel_height: u32,
    pub font_family: String,
    pub background: String,
}

impl Default for FigureLayout {
    fn default() -> Self {
        Self {
            width: 2000,
            panel_height: 800,
            font_family: "DejaVu Sans, Arial, sans-serif".to_string(),
            background: "#ffffff".to_string(),
        }
    }
}

impl FigureLayout {
    pub fn new(width: u32, panel_height: u32) -> Self {
        Self {
            width,
            panel_height,
            ..Self::default()
        }
    }
}

/// Arrows drawn over a panel from pre-normalised (u, v) grids.
#[derive(Debug, Clone)]
pub struct QuiverLayer<'a> {
    pub u: &'a ProfileGrid,
    pub v: &'a ProfileGrid,
    pub config: QuiverConfig,
}

/// One heatmap panel.
#[derive(Debug, Clone)]
pub struct Panel<'a> {
    pub grid: &'a ProfileGrid,
    pub style: PlotStyle,
    pub title: Option<String>,
    pub colorbar_label: String,
    pub quiver: Option<QuiverLayer<'a>>,
}

impl<'a> Panel<'a> {
    /// A panel labelled with [`colorbar_label`] for `grid`.
    pub fn new(grid: &'a ProfileGrid, style: PlotStyle) -> Self {
        Self {
            grid,
            style,
            title: None,
            colorbar_label: colorbar_label(grid),
            quiver: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_colorbar_label(mut self, label: impl Into<String>) -> Self {
        self.colorbar_label = label.into();
        self
    }

    pub fn with_quiver(mut self, layer: QuiverLayer<'a>) -> Self {
        self.quiver = Some(layer);
        self
    }
}

/// `"<name> (<units>)"`, or just the name when the grid has no units.
pub fn colorbar_label(grid: &ProfileGrid) -> String {
    match grid.units() {
        Some(units) if !units.is_empty() => format!("{} ({})", grid.name(), units),
        _ => grid.name().to_string(),
    }
}

/// A stack of panels over shared axes.
#[derive(Debug, Clone)]
pub struct Figure<'a> {
    time_axis: &'a TimeAxis,
    altitude: &'a AltitudeAxis,
    layout: FigureLayout,
    caption: Option<String>,
    panels: Vec<Panel<'a>>,
}

impl<'a> Figure<'a> {
    pub fn new(time_axis: &'a TimeAxis, altitude: &'a AltitudeAxis) -> Self {
        Self {
            time_axis,
            altitude,
            layout: FigureLayout::default(),
            caption: None,
            panels: Vec::new(),
        }
    }

    pub fn with_layout(mut self, layout: FigureLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Text drawn above the first panel's top-left corner. Newlines start
    /// new lines.
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_panel(mut self, panel: Panel<'a>) -> Self {
        self.panels.push(panel);
        self
    }

    pub fn push_panel(&mut self, panel: Panel<'a>) {
        self.panels.push(panel);
    }

    pub fn panels(&self) -> &[Panel<'a>] {
        &self.panels
    }

    /// Canvas size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (
            self.layout.width,
            self.layout.panel_height * self.panels.len().max(1) as u32,
        )
    }

    /// Compose the SVG document.
    pub fn to_svg(&self) -> RenderResult<String> {
        self.validate()?;

        let (width, height) = self.size();
        let mut svg = String::with_capacity(256 * 1024);
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{font}">"#,
            w = width,
            h = height,
            font = escape_xml(&self.layout.font_family),
        );
        let _ = write!(
            svg,
            r#"<rect width="{}" height="{}" fill="{}"/>"#,
            width,
            height,
            escape_xml(&self.layout.background)
        );

        let frame = AxesFrame::new(self.time_axis, self.altitude)?;
        for (index, panel) in self.panels.iter().enumerate() {
            let top = index as f64 * self.layout.panel_height as f64;
            let area = PlotArea::new(self.layout.width as f64, self.layout.panel_height as f64, top);
            self.write_panel(&mut svg, index, panel, &frame, &area)?;
            if index == 0 {
                if let Some(caption) = &self.caption {
                    write_caption(&mut svg, caption, &area);
                }
            }
        }

        svg.push_str("</svg>");

        debug!(
            panels = self.panels.len(),
            width = width,
            height = height,
            bytes = svg.len(),
            "Composed figure"
        );

        Ok(svg)
    }

    fn validate(&self) -> RenderResult<()> {
        if self.panels.is_empty() {
            return Err(RenderError::InvalidInput("figure has no panels".to_string()));
        }
        if self.layout.width == 0 || self.layout.panel_height == 0 {
            return Err(RenderError::InvalidInput("figure size is zero".to_string()));
        }

        let expected = (self.time_axis.len(), self.altitude.len());
        for panel in &self.panels {
            check_shape(panel.grid, expected)?;
            if let Some(layer) = &panel.quiver {
                check_shape(layer.u, expected)?;
                check_shape(layer.v, expected)?;
            }
        }
        Ok(())
    }

    fn write_panel(
        &self,
        svg: &mut String,
        index: usize,
        panel: &Panel<'_>,
        frame: &AxesFrame,
        area: &PlotArea,
    ) -> RenderResult<()> {
        let colormap = panel.style.build_colormap()?;
        let range = panel.style.range.resolve(panel.grid.valid_values());

        let clip_id = format!("plot-area-{}", index);
        let _ = write!(
            svg,
            r#"<defs><clipPath id="{}"><rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}"/></clipPath></defs>"#,
            clip_id,
            area.left,
            area.top,
            area.width(),
            area.height()
        );

        let _ = write!(svg, r#"<g clip-path="url(#{})">"#, clip_id);
        write_cells(svg, panel.grid, &colormap, &range, frame, area);
        write_grid_lines(svg, frame, area);
        if let Some(layer) = &panel.quiver {
            write_quiver(svg, layer, frame, area);
        }
        svg.push_str("</g>");

        write_axes(svg, frame, area);

        if let Some(title) = &panel.title {
            let _ = write!(
                svg,
                r#"<text x="{:.2}" y="{:.2}" font-size="{}" text-anchor="middle">{}</text>"#,
                area.left + area.width() / 2.0,
                area.top - 16.0,
                TITLE_PX,
                escape_xml(title)
            );
        }

        write_colorbar(svg, &colormap, &range, &panel.colorbar_label, area);
        Ok(())
    }
}

fn check_shape(grid: &ProfileGrid, expected: (usize, usize)) -> RenderResult<()> {
    if grid.shape() != expected {
        return Err(RenderError::InvalidInput(format!(
            "grid {} is {:?}, axes are {:?}",
            grid.name(),
            grid.shape(),
            expected
        )));
    }
    Ok(())
}

// =============================================================================
// Geometry
// =============================================================================

/// Pixel rectangle of one panel's plotting area.
#[derive(Debug, Clone, Copy)]
struct PlotArea {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

impl PlotArea {
    fn new(width: f64, panel_height: f64, panel_top: f64) -> Self {
        let right = (width - MARGIN_RIGHT).max(MARGIN_LEFT + 1.0);
        let bottom = (panel_top + panel_height - MARGIN_BOTTOM).max(panel_top + MARGIN_TOP + 1.0);
        Self {
            left: MARGIN_LEFT,
            right,
            top: panel_top + MARGIN_TOP,
            bottom,
        }
    }

    fn width(&self) -> f64 {
        self.right - self.left
    }

    fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Cell edges of both axes, shared by every panel.
#[derive(Debug, Clone)]
struct AxesFrame {
    time_centers: Vec<f64>,
    time_edges: Vec<f64>,
    altitude_centers: Vec<f64>,
    altitude_edges: Vec<f64>,
    time_span: (f64, f64),
    altitude_span: (f64, f64),
}

impl AxesFrame {
    fn new(time_axis: &TimeAxis, altitude: &AltitudeAxis) -> RenderResult<Self> {
        if time_axis.is_empty() {
            return Err(RenderError::InvalidInput("time axis is empty".to_string()));
        }
        if altitude.is_empty() {
            return Err(RenderError::InvalidInput("altitude axis is empty".to_string()));
        }

        let time_centers: Vec<f64> = time_axis.timestamps().iter().map(|&t| t as f64).collect();
        let altitude_centers: Vec<f64> = altitude.levels().iter().map(|&a| a as f64).collect();

        let time_edges = cell_edges(&time_centers, time_axis.step_seconds() as f64 / 2.0);
        let altitude_edges = cell_edges(&altitude_centers, LONE_LEVEL_HALF_HEIGHT_M);

        Ok(Self {
            time_span: span(&time_edges),
            altitude_span: span(&altitude_edges),
            time_centers,
            time_edges,
            altitude_centers,
            altitude_edges,
        })
    }

    fn x(&self, timestamp: f64, area: &PlotArea) -> f64 {
        lerp(timestamp, self.time_span, (area.left, area.right))
    }

    fn y(&self, altitude: f64, area: &PlotArea) -> f64 {
        lerp(altitude, self.altitude_span, (area.bottom, area.top))
    }
}

/// Edges halfway between neighbouring centres, with the outer cells as wide
/// as their inner neighbour. A single centre gets `lone_half_width` each side.
fn cell_edges(centers: &[f64], lone_half_width: f64) -> Vec<f64> {
    match centers {
        [] => Vec::new(),
        [only] => vec![only - lone_half_width, only + lone_half_width],
        _ => {
            let n = centers.len();
            let mut edges = Vec::with_capacity(n + 1);
            edges.push(centers[0] - (centers[1] - centers[0]) / 2.0);
            edges.extend(centers.windows(2).map(|w| (w[0] + w[1]) / 2.0));
            edges.push(centers[n - 1] + (centers[n - 1] - centers[n - 2]) / 2.0);
            edges
        }
    }
}

fn span(edges: &[f64]) -> (f64, f64) {
    edges
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &e| (lo.min(e), hi.max(e)))
}

fn lerp(value: f64, domain: (f64, f64), range: (f64, f64)) -> f64 {
    let width = domain.1 - domain.0;
    if width.abs() < f64::EPSILON {
        return (range.0 + range.1) / 2.0;
    }
    range.0 + (value - domain.0) / width * (range.1 - range.0)
}

// =============================================================================
// Layers
// =============================================================================

/// Filled cells, merging runs of equal colour along the time axis.
fn write_cells(
    svg: &mut String,
    grid: &ProfileGrid,
    colormap: &Colormap,
    range: &ColorRange,
    frame: &AxesFrame,
    area: &PlotArea,
) {
    svg.push_str(r#"<g shape-rendering="crispEdges">"#);

    let (rows, cols) = grid.shape();
    for col in 0..cols {
        let y_a = frame.y(frame.altitude_edges[col], area);
        let y_b = frame.y(frame.altitude_edges[col + 1], area);
        let (y, h) = (y_a.min(y_b), (y_a - y_b).abs());

        let mut run: Option<(usize, String)> = None;
        for row in 0..=rows {
            let fill = (row < rows)
                .then(|| grid.value(row, col))
                .filter(|v| !v.is_nan())
                .map(|v| colormap.color_at(range.normalize(v)).to_hex());

            let continues = matches!((&run, &fill), (Some((_, a)), Some(b)) if a == b);
            if continues {
                continue;
            }
            if let Some((start, color)) = run.take() {
                let x0 = frame.x(frame.time_edges[start], area);
                let x1 = frame.x(frame.time_edges[row], area);
                let _ = write!(
                    svg,
                    r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
                    x0,
                    y,
                    x1 - x0,
                    h,
                    color
                );
            }
            run = fill.map(|color| (row, color));
        }
    }

    svg.push_str("</g>");
}

fn write_grid_lines(svg: &mut String, frame: &AxesFrame, area: &PlotArea) {
    let mut d = String::new();
    for tick in time_ticks(frame.time_span.0.ceil() as i64, frame.time_span.1.floor() as i64) {
        let x = frame.x(tick.timestamp as f64, area);
        let _ = write!(d, "M{:.2} {:.2}V{:.2}", x, area.top, area.bottom);
    }
    let (ticks, _) = altitude_ticks(frame);
    for value in ticks {
        let y = frame.y(value as f64, area);
        let _ = write!(d, "M{:.2} {:.2}H{:.2}", area.left, y, area.right);
    }
    if !d.is_empty() {
        let _ = write!(
            svg,
            r#"<path d="{}" stroke="{}" stroke-width="0.8" fill="none"/>"#,
            d, GRID_COLOR
        );
    }
}

fn write_quiver(svg: &mut String, layer: &QuiverLayer<'_>, frame: &AxesFrame, area: &PlotArea) {
    let length_px = layer.config.arrow_pixels(area.width() as f32);
    let (rows, cols) = layer.u.shape();

    let mut d = String::new();
    for (row, col) in quiver_positions(rows, cols, layer.config.interval) {
        let x = frame.x(frame.time_centers[row], area) as f32;
        let y = frame.y(frame.altitude_centers[col], area) as f32;
        if let Some(path) = arrow_path(x, y, layer.u.value(row, col), layer.v.value(row, col), length_px) {
            d.push_str(&path);
        }
    }

    if !d.is_empty() {
        let _ = write!(
            svg,
            r#"<path class="quiver" d="{}" stroke="{}" stroke-width="{}" fill="none" stroke-linecap="round"/>"#,
            d,
            escape_xml(&layer.config.color),
            layer.config.line_width
        );
    }
}

fn altitude_ticks(frame: &AxesFrame) -> (Vec<f32>, f32) {
    nice_ticks(frame.altitude_span.0 as f32, frame.altitude_span.1 as f32, 8)
}

/// Frame, tick marks, tick labels and axis labels.
fn write_axes(svg: &mut String, frame: &AxesFrame, area: &PlotArea) {
    let _ = write!(
        svg,
        r##"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="none" stroke="#000000" stroke-width="1.2"/>"##,
        area.left,
        area.top,
        area.width(),
        area.height()
    );

    let mut marks = String::new();
    let mut labels = String::new();

    for tick in time_ticks(frame.time_span.0.ceil() as i64, frame.time_span.1.floor() as i64) {
        let x = frame.x(tick.timestamp as f64, area);
        let length = if tick.major { 10.0 } else { 6.0 };
        let _ = write!(marks, "M{:.2} {:.2}v{:.1}", x, area.bottom, length);

        let _ = write!(
            labels,
            r#"<text x="{:.2}" y="{:.2}" font-size="{}" text-anchor="middle">"#,
            x,
            area.bottom + 14.0 + TICK_LABEL_PX,
            TICK_LABEL_PX
        );
        for (line, text) in tick.label.iter().enumerate() {
            let dy = if line == 0 { 0.0 } else { TICK_LABEL_PX * 1.2 };
            let _ = write!(
                labels,
                r#"<tspan x="{:.2}" dy="{:.1}">{}</tspan>"#,
                x,
                dy,
                escape_xml(text)
            );
        }
        labels.push_str("</text>");
    }

    let (ticks, step) = altitude_ticks(frame);
    for value in ticks {
        let y = frame.y(value as f64, area);
        let _ = write!(marks, "M{:.2} {:.2}h-6", area.left, y);
        let _ = write!(
            labels,
            r#"<text x="{:.2}" y="{:.2}" font-size="{}" text-anchor="end" dominant-baseline="central">{}</text>"#,
            area.left - 10.0,
            y,
            TICK_LABEL_PX,
            format_tick(value, step)
        );
    }

    let _ = write!(
        svg,
        r##"<path d="{}" stroke="#000000" stroke-width="1" fill="none"/>{}"##,
        marks, labels
    );

    let _ = write!(
        svg,
        r#"<text x="{:.2}" y="{:.2}" font-size="{}" text-anchor="middle">Time (UTC)</text>"#,
        area.left + area.width() / 2.0,
        area.bottom + MARGIN_BOTTOM - 12.0,
        AXIS_LABEL_PX
    );
    let (lx, ly) = (area.left - 95.0, area.top + area.height() / 2.0);
    let _ = write!(
        svg,
        r#"<text x="{lx:.2}" y="{ly:.2}" font-size="{}" text-anchor="middle" transform="rotate(-90 {lx:.2} {ly:.2})">Altitude (m)</text>"#,
        AXIS_LABEL_PX,
        lx = lx,
        ly = ly
    );
}

/// Vertical colour bar to the right of the plot area, low values at the
/// bottom.
fn write_colorbar(
    svg: &mut String,
    colormap: &Colormap,
    range: &ColorRange,
    label: &str,
    area: &PlotArea,
) {
    let x = area.right + COLORBAR_GAP;
    let band = area.height() / COLORBAR_BANDS as f64;

    svg.push_str(r#"<g class="colorbar" shape-rendering="crispEdges">"#);
    for k in 0..COLORBAR_BANDS {
        let t = (k as f32 + 0.5) / COLORBAR_BANDS as f32;
        let y = area.bottom - (k + 1) as f64 * band;
        let _ = write!(
            svg,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
            x,
            y,
            COLORBAR_WIDTH,
            band + 0.5,
            colormap.color_at(t).to_hex()
        );
    }
    svg.push_str("</g>");

    let _ = write!(
        svg,
        r##"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="none" stroke="#000000" stroke-width="1"/>"##,
        x,
        area.top,
        COLORBAR_WIDTH,
        area.height()
    );

    let (ticks, step) = nice_ticks(range.min, range.max, 6);
    let mut marks = String::new();
    for value in ticks.into_iter().filter(|v| *v >= range.min && *v <= range.max) {
        let y = area.bottom - range.normalize(value) as f64 * area.height();
        let _ = write!(marks, "M{:.2} {:.2}h6", x + COLORBAR_WIDTH, y);
        let _ = write!(
            svg,
            r#"<text x="{:.2}" y="{:.2}" font-size="{}" dominant-baseline="central">{}</text>"#,
            x + COLORBAR_WIDTH + 10.0,
            y,
            COLORBAR_TICK_PX,
            format_tick(value, step)
        );
    }
    if !marks.is_empty() {
        let _ = write!(
            svg,
            r##"<path d="{}" stroke="#000000" stroke-width="1" fill="none"/>"##,
            marks
        );
    }

    let (lx, ly) = (x + COLORBAR_WIDTH + 110.0, area.top + area.height() / 2.0);
    let _ = write!(
        svg,
        r#"<text x="{lx:.2}" y="{ly:.2}" font-size="{}" text-anchor="middle" transform="rotate(90 {lx:.2} {ly:.2})">{}</text>"#,
        AXIS_LABEL_PX,
        escape_xml(label),
        lx = lx,
        ly = ly
    );
}

fn write_caption(svg: &mut String, caption: &str, area: &PlotArea) {
    let lines: Vec<&str> = caption.lines().collect();
    let line_height = CAPTION_PX * 1.25;
    // Last line sits just above the panel title.
    let baseline = area.top - 16.0 - TITLE_PX - 8.0 - line_height * (lines.len().max(1) - 1) as f64;

    let _ = write!(
        svg,
        r#"<text class="caption" x="{:.2}" y="{:.2}" font-size="{}">"#,
        area.left,
        baseline.max(CAPTION_PX),
        CAPTION_PX
    );
    for (i, line) in lines.iter().enumerate() {
        let dy = if i == 0 { 0.0 } else { line_height };
        let _ = write!(
            svg,
            r#"<tspan x="{:.2}" dy="{:.2}">{}</tspan>"#,
            area.left,
            dy,
            escape_xml(line)
        );
    }
    svg.push_str("</text>");
}

/// Escape text for use in SVG character data and attribute values.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
