//! Figure builders for the three plot kinds.
//!
//! Each plot assembles only the variables it draws, so a variable missing
//! from a source fails that plot alone.

use anyhow::{Context, Result};
use grid_assembler::{assemble_many, derive_wind_components, Assembly, WindComponents};
use profiler_common::{DaySource, ProfileGrid, TimeAxis};
use renderer::{Figure, FigureLayout, Panel, QuiverLayer, Rasterizer, RenderedFigure};
use tracing::debug;

use crate::config::{VariableSettings, WindSettings};
use crate::naming::Product;

/// Title and caption of one figure.
#[derive(Debug, Clone, Default)]
pub struct PlotText {
    pub title: Option<String>,
    pub caption: Option<String>,
}

/// One plot to draw.
#[derive(Debug, Clone, Copy)]
pub enum PlotSpec<'a> {
    Wind(&'a WindSettings),
    Variable(&'a VariableSettings),
    Multipanel(&'a [VariableSettings]),
}

impl PlotSpec<'_> {
    pub fn product(&self) -> Product {
        match self {
            PlotSpec::Wind(_) => Product::Wind,
            PlotSpec::Variable(var) => Product::Variable(var.name.clone()),
            PlotSpec::Multipanel(_) => Product::Multipanel,
        }
    }

    /// Variables this plot reads, in panel order.
    pub fn variables(&self) -> Vec<&str> {
        match self {
            PlotSpec::Wind(wind) => vec![wind.speed_variable.as_str(), wind.direction_variable.as_str()],
            PlotSpec::Variable(var) => vec![var.name.as_str()],
            PlotSpec::Multipanel(vars) => vars.iter().map(|v| v.name.as_str()).collect(),
        }
    }
}

/// Assemble, compose and rasterise one plot.
///
/// `sources` are ordered oldest to newest, `None` marking absent days.
pub fn draw(
    spec: PlotSpec<'_>,
    axis: &TimeAxis,
    sources: &[Option<DaySource>],
    layout: &FigureLayout,
    text: &PlotText,
    rasterizer: &Rasterizer,
) -> Result<RenderedFigure> {
    let assembly = assemble_many(&spec.variables(), axis, sources)
        .with_context(|| format!("Failed to assemble {}", spec.product().label()))?;

    if assembly.is_empty() {
        debug!(product = %spec.product().label(), "No samples on the axis, drawing an empty plot");
    }

    let rendered = match spec {
        PlotSpec::Wind(wind) => {
            let arrows = wind_arrows(&assembly, wind)?;
            let figure = wind_figure(&assembly, &arrows, wind, layout, text)?;
            rasterizer.render_figure(&figure)?
        }
        PlotSpec::Variable(var) => {
            let figure = variable_figure(&assembly, var, layout, text)?;
            rasterizer.render_figure(&figure)?
        }
        PlotSpec::Multipanel(vars) => {
            let figure = multipanel_figure(&assembly, vars, layout, text)?;
            rasterizer.render_figure(&figure)?
        }
    };

    Ok(rendered)
}

fn require_grid<'a>(assembly: &'a Assembly, name: &str) -> Result<&'a ProfileGrid> {
    assembly
        .grid(name)
        .with_context(|| format!("Grid {} was not assembled", name))
}

fn new_figure<'a>(assembly: &'a Assembly, layout: &FigureLayout, text: &PlotText) -> Figure<'a> {
    let figure = Figure::new(&assembly.time_axis, &assembly.altitude).with_layout(layout.clone());
    match &text.caption {
        Some(caption) => figure.with_caption(caption.clone()),
        None => figure,
    }
}

fn titled<'a>(panel: Panel<'a>, text: &PlotText) -> Panel<'a> {
    match &text.title {
        Some(title) => panel.with_title(title.clone()),
        None => panel,
    }
}

/// Unit-length (u, v) arrows for the wind plot.
pub fn wind_arrows(assembly: &Assembly, wind: &WindSettings) -> Result<WindComponents> {
    let speed = require_grid(assembly, &wind.speed_variable)?;
    let direction = require_grid(assembly, &wind.direction_variable)?;
    let components = derive_wind_components(speed, direction)?;
    Ok(components.normalized(wind.arrow_length))
}

/// Wind speed heatmap with direction arrows.
pub fn wind_figure<'a>(
    assembly: &'a Assembly,
    arrows: &'a WindComponents,
    wind: &WindSettings,
    layout: &FigureLayout,
    text: &PlotText,
) -> Result<Figure<'a>> {
    let speed = require_grid(assembly, &wind.speed_variable)?;
    let panel = Panel::new(speed, wind.style.clone())
        .with_colorbar_label(wind.colorbar_label.clone())
        .with_quiver(QuiverLayer {
            u: &arrows.u,
            v: &arrows.v,
            config: wind.quiver(),
        });

    Ok(new_figure(assembly, layout, text).with_panel(titled(panel, text)))
}

/// One variable as a heatmap.
pub fn variable_figure<'a>(
    assembly: &'a Assembly,
    var: &VariableSettings,
    layout: &FigureLayout,
    text: &PlotText,
) -> Result<Figure<'a>> {
    let grid = require_grid(assembly, &var.name)?;
    let panel = Panel::new(grid, var.style.clone());
    Ok(new_figure(assembly, layout, text).with_panel(titled(panel, text)))
}

/// Stacked panels sharing the time axis. The title, if any, goes on the top
/// panel only.
pub fn multipanel_figure<'a>(
    assembly: &'a Assembly,
    vars: &[VariableSettings],
    layout: &FigureLayout,
    text: &PlotText,
) -> Result<Figure<'a>> {
    let mut figure = new_figure(assembly, layout, text);
    for (i, var) in vars.iter().enumerate() {
        let panel = Panel::new(require_grid(assembly, &var.name)?, var.style.clone());
        figure.push_panel(if i == 0 { titled(panel, text) } else { panel });
    }
    Ok(figure)
}
