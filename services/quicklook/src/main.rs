//! Wind profiler quick-look plotter.
//!
//! Draws the rolling 24/48 hour plots for every configured mode, or the
//! plots of a single day with `--day`. Intended to run from cron.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;
use netcdf_parser::silence_hdf5_errors;
use quicklook::{load_config, validate_config, NetCdfLoader, QuicklookConfig, Runner};
use renderer::Rasterizer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "quicklook")]
#[command(about = "Quick-look plots for radar wind profiler data")]
struct Args {
    /// Configuration file path (built-in defaults when omitted)
    #[arg(short, long, env = "QUICKLOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Operating mode to plot, repeatable (default: all configured)
    #[arg(short, long)]
    mode: Vec<String>,

    /// Plot only this window length in days
    #[arg(short, long)]
    window: Option<u32>,

    /// Draw the single-day plots for this date (YYYY-MM-DD) instead
    #[arg(long)]
    day: Option<NaiveDate>,

    /// Wall clock to plot against, RFC 3339 (default: now)
    #[arg(long)]
    now: Option<DateTime<Utc>>,

    /// Log filter, overridden by RUST_LOG when set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    init_tracing(&args)?;
    silence_hdf5_errors();

    let config = build_config(&args)?;
    info!(
        modes = ?config.modes,
        windows = ?config.windows,
        data_dir = %config.data_dir.display(),
        plots_dir = %config.plots_dir.display(),
        "Starting quick-look run"
    );

    let runner = Runner::new(config, NetCdfLoader, Rasterizer::new());
    let summary = match args.day {
        Some(date) => runner.run_day(date),
        None => runner.run(args.now.unwrap_or_else(Utc::now)),
    };

    if summary.is_success() {
        info!(written = summary.written, "Quick-look run completed");
        Ok(ExitCode::SUCCESS)
    } else {
        warn!(
            written = summary.written,
            failed = summary.failed,
            "Quick-look run completed with failures"
        );
        Ok(ExitCode::FAILURE)
    }
}

fn log_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
}

fn init_tracing(args: &Args) -> Result<()> {
    let builder = FmtSubscriber::builder()
        .with_env_filter(log_filter(&args.log_level))
        .with_target(true);

    if args.json_logs {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

/// Load the configuration and apply command-line overrides.
fn build_config(args: &Args) -> Result<QuicklookConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => QuicklookConfig::default(),
    };

    if !args.mode.is_empty() {
        if args.day.is_some() {
            config.day.modes = args.mode.clone();
        } else {
            config.modes = args.mode.clone();
        }
    }
    if let Some(window) = args.window {
        config.windows = vec![window];
    }

    validate_config(&config).context("Invalid configuration after command-line overrides")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_from_flag() {
        std::env::remove_var("RUST_LOG");
        assert_eq!(log_filter("debug").to_string(), "debug");

        let targeted = log_filter("quicklook=trace,warn").to_string();
        assert!(targeted.contains("quicklook=trace"));
        assert!(targeted.contains("warn"));
    }
}
