//! Batch runner: rolling-window and single-day plot runs.
//!
//! Every plot is an isolated job. A failing job is logged with its mode,
//! window or date, and source paths, counted in the [`RunSummary`], and the
//! batch carries on with the next one.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use grid_assembler::{build_axis, build_day_axis, resolve_cadence};
use profiler_common::DaySource;
use renderer::{FigureLayout, Rasterizer};
use tracing::{error, info, instrument};

use crate::config::QuicklookConfig;
use crate::loader::SourceLoader;
use crate::naming::{
    day_artifact_name, day_title, expand_template, rolling_artifact_name, window_title,
    TemplateContext,
};
use crate::output::write_artifacts;
use crate::plots::{draw, PlotSpec, PlotText};

/// Outcome of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Artifact files written
    pub written: usize,
    /// Jobs that failed
    pub failed: usize,
}

impl RunSummary {
    pub fn merge(self, other: RunSummary) -> RunSummary {
        RunSummary {
            written: self.written + other.written,
            failed: self.failed + other.failed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    fn record(&mut self, outcome: Result<Vec<PathBuf>>, describe: impl FnOnce(&anyhow::Error)) {
        match outcome {
            Ok(paths) => self.written += paths.len(),
            Err(e) => {
                describe(&e);
                self.failed += 1;
            }
        }
    }
}

/// Draws every configured plot from day files fetched through `L`.
pub struct Runner<L> {
    config: QuicklookConfig,
    loader: L,
    rasterizer: Rasterizer,
    layout: FigureLayout,
}

impl<L: SourceLoader> Runner<L> {
    pub fn new(config: QuicklookConfig, loader: L, rasterizer: Rasterizer) -> Self {
        let layout = config.figure.layout();
        Self {
            config,
            loader,
            rasterizer,
            layout,
        }
    }

    pub fn config(&self) -> &QuicklookConfig {
        &self.config
    }

    /// Rolling plots, plus today's day plots when day mode is enabled.
    pub fn run(&self, now: DateTime<Utc>) -> RunSummary {
        let mut summary = self.run_rolling(now);
        if self.config.day.enabled {
            summary = summary.merge(self.run_day(now.date_naive()));
        }
        summary
    }

    /// Source paths for the days `today - max_window ..= today`, oldest first.
    pub fn rolling_paths(&self, mode: &str, today: NaiveDate) -> Result<Vec<PathBuf>> {
        let max_window = self.config.max_window() as i64;
        (0..=max_window)
            .rev()
            .map(|back| -> Result<PathBuf> {
                let ctx = TemplateContext {
                    instrument: &self.config.instrument,
                    site: &self.config.site,
                    version: &self.config.version,
                    mode,
                    date: today - Duration::days(back),
                };
                let name = expand_template(&self.config.source_template, &ctx)?;
                Ok(self.config.data_dir.join(name))
            })
            .collect()
    }

    /// Source path and output directory of a day run.
    pub fn day_paths(&self, mode: &str, date: NaiveDate) -> Result<(PathBuf, PathBuf)> {
        let day = &self.config.day;
        let ctx = TemplateContext {
            instrument: &self.config.instrument,
            site: &day.site,
            version: &self.config.version,
            mode,
            date,
        };
        let source = day.data_dir.join(expand_template(&day.source_template, &ctx)?);
        let out_dir = day.plots_dir.join(expand_template(&day.output_subdir, &ctx)?);
        Ok((source, out_dir))
    }

    fn rolling_specs(&self) -> Vec<PlotSpec<'_>> {
        let mut specs = vec![PlotSpec::Wind(&self.config.wind)];
        specs.extend(self.config.variables.iter().map(PlotSpec::Variable));
        if !self.config.multipanel.is_empty() {
            specs.push(PlotSpec::Multipanel(&self.config.multipanel));
        }
        specs
    }

    /// Reads each day file on its own.
    ///
    /// A file that fails to read is left as `None` and flagged in the returned
    /// mask, so only the windows covering it are lost.
    fn load_sources(
        &self,
        mode: &str,
        paths: &[PathBuf],
        variables: &[&str],
    ) -> (Vec<Option<DaySource>>, Vec<bool>) {
        paths
            .iter()
            .map(|path| match self.loader.load(path, variables) {
                Ok(source) => (source, false),
                Err(e) => {
                    error!(
                        mode = %mode,
                        path = %path.display(),
                        error = %format!("{:#}", e),
                        "Could not read source"
                    );
                    (None, true)
                }
            })
            .unzip()
    }

    // =========================================================================
    // Rolling windows
    // =========================================================================

    /// Every plot for every mode and window ending at `now`.
    ///
    /// Each mode's day files are read once and shared by all its windows. A
    /// window covering an unreadable file counts as one failure and is
    /// skipped; windows that do not reach back to that file still run.
    pub fn run_rolling(&self, now: DateTime<Utc>) -> RunSummary {
        let mut summary = RunSummary::default();
        let today = now.date_naive();
        let variables = self.config.rolling_variables();

        for mode in &self.config.modes {
            let paths = match self.rolling_paths(mode, today) {
                Ok(paths) => paths,
                Err(e) => {
                    error!(mode = %mode, error = %format!("{:#}", e), "Could not build source paths");
                    summary.failed += 1;
                    continue;
                }
            };
            let (sources, unreadable) = self.load_sources(mode, &paths, &variables);

            info!(
                mode = %mode,
                present = sources.iter().flatten().count(),
                unreadable = unreadable.iter().filter(|&&u| u).count(),
                expected = sources.len(),
                "Loaded sources"
            );

            for &window_days in &self.config.windows {
                let first = sources.len().saturating_sub(window_days as usize + 1);
                let window_sources = &sources[first..];
                let window_paths = &paths[first..];

                let broken: Vec<&PathBuf> = window_paths
                    .iter()
                    .zip(&unreadable[first..])
                    .filter_map(|(path, &bad)| bad.then_some(path))
                    .collect();
                if !broken.is_empty() {
                    error!(
                        mode = %mode,
                        window_days,
                        unreadable = ?broken,
                        "Skipping window, a source could not be read"
                    );
                    summary.failed += 1;
                    continue;
                }

                for spec in self.rolling_specs() {
                    let outcome = self.rolling_job(spec, mode, window_days, window_sources, now);
                    summary.record(outcome, |e| {
                        error!(
                            mode = %mode,
                            window_days,
                            product = %spec.product().label(),
                            sources = ?window_paths,
                            error = %format!("{:#}", e),
                            "Plot failed"
                        );
                    });
                }
            }
        }

        info!(written = summary.written, failed = summary.failed, "Rolling run finished");
        summary
    }

    #[instrument(
        skip(self, spec, sources, now),
        fields(product = %spec.product().label())
    )]
    fn rolling_job(
        &self,
        spec: PlotSpec<'_>,
        mode: &str,
        window_days: u32,
        sources: &[Option<DaySource>],
        now: DateTime<Utc>,
    ) -> Result<Vec<PathBuf>> {
        let cadence = resolve_cadence(sources, self.config.fallback_cadence_minutes)?;
        let axis = build_axis(cadence, window_days, now)?;

        // The multipanel figure carries the caption but no title.
        let title = match spec {
            PlotSpec::Multipanel(_) => None,
            _ => Some(window_title(window_days)),
        };
        let text = PlotText {
            title,
            caption: self.config.caption.clone(),
        };

        let rendered = draw(spec, &axis, sources, &self.layout, &text, &self.rasterizer)?;
        let stem = rolling_artifact_name(
            &self.config.output_prefix,
            mode,
            &spec.product(),
            window_days,
        );
        write_artifacts(&self.config.plots_dir, &stem, &self.config.formats, &rendered)
    }

    // =========================================================================
    // Single day
    // =========================================================================

    /// Wind and per-variable plots of one calendar day for every day mode.
    ///
    /// A mode whose file is absent is skipped.
    pub fn run_day(&self, date: NaiveDate) -> RunSummary {
        let mut summary = RunSummary::default();
        let day = &self.config.day;
        let wind = self.config.wind.with_style(day.wind_style.clone());
        let variables = day.variables_with_wind(&self.config.wind);

        for mode in &day.modes {
            let loaded = self.day_paths(mode, date).and_then(|(path, out_dir)| {
                let source = self.loader.load(&path, &variables)?;
                Ok((source, path, out_dir))
            });
            let (source, path, out_dir) = match loaded {
                Ok((Some(source), path, out_dir)) => (source, path, out_dir),
                Ok((None, path, _)) => {
                    info!(mode = %mode, date = %date, path = %path.display(), "No file for this day, skipping mode");
                    continue;
                }
                Err(e) => {
                    error!(mode = %mode, date = %date, error = %format!("{:#}", e), "Could not load day file");
                    summary.failed += 1;
                    continue;
                }
            };

            let sources = [Some(source)];
            let specs = std::iter::once(PlotSpec::Wind(&wind))
                .chain(day.variables.iter().map(PlotSpec::Variable));

            for spec in specs {
                let outcome = self.day_job(spec, mode, date, &sources, &out_dir);
                summary.record(outcome, |e| {
                    error!(
                        mode = %mode,
                        date = %date,
                        product = %spec.product().label(),
                        source = %path.display(),
                        error = %format!("{:#}", e),
                        "Plot failed"
                    );
                });
            }
        }

        info!(
            date = %date,
            written = summary.written,
            failed = summary.failed,
            "Day run finished"
        );
        summary
    }

    #[instrument(
        skip(self, spec, sources, out_dir),
        fields(product = %spec.product().label())
    )]
    fn day_job(
        &self,
        spec: PlotSpec<'_>,
        mode: &str,
        date: NaiveDate,
        sources: &[Option<DaySource>],
        out_dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        let cadence = resolve_cadence(sources, self.config.fallback_cadence_minutes)?;
        let axis = build_day_axis(cadence, date)
            .with_context(|| format!("No axis for {}", date))?;

        let product = spec.product();
        let text = PlotText {
            title: Some(day_title(&product, date)),
            caption: None,
        };

        let rendered = draw(spec, &axis, sources, &self.layout, &text, &self.rasterizer)?;
        write_artifacts(out_dir, &day_artifact_name(&product), &self.config.formats, &rendered)
    }
}
