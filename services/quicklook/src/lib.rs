//! Quick-look plots for radar wind profilers.
//!
//! A run reads the last few daily NetCDF files for each operating mode,
//! joins them onto a fixed-cadence time axis and writes PNG and SVG
//! figures:
//!
//! - wind speed with fixed-length direction arrows,
//! - one heatmap per configured variable,
//! - a stacked multipanel of several variables,
//!
//! each for the last 24 and 48 hours. A separate day mode draws one
//! calendar day per directory for field deployments.
//!
//! # Example
//!
//! ```no_run
//! use chrono::Utc;
//! use quicklook::{load_config, NetCdfLoader, Runner};
//! use renderer::Rasterizer;
//!
//! let config = load_config("config/quicklook.yaml")?;
//! let runner = Runner::new(config, NetCdfLoader, Rasterizer::new());
//! let summary = runner.run(Utc::now());
//! println!("{} written, {} failed", summary.written, summary.failed);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod config_loader;
pub mod loader;
pub mod naming;
pub mod output;
pub mod plots;
pub mod runner;

pub use config::{
    DaySettings, FigureSettings, OutputFormat, QuicklookConfig, VariableSettings, WindSettings,
};
pub use config_loader::{load_config, parse_config, validate_config};
pub use loader::{NetCdfLoader, SourceLoader};
pub use naming::{
    day_artifact_name, expand_template, rolling_artifact_name, window_title, NamingError,
    Product, TemplateContext,
};
pub use plots::{PlotSpec, PlotText};
pub use runner::{RunSummary, Runner};
