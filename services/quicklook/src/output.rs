//! Writing rendered figures to disk.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use renderer::RenderedFigure;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::config::OutputFormat;

/// Write `<dir>/<stem>.<ext>` for every format, creating `dir` if needed.
pub fn write_artifacts(
    dir: &Path,
    stem: &str,
    formats: &[OutputFormat],
    rendered: &RenderedFigure,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    formats
        .iter()
        .map(|format| {
            let path = dir.join(format!("{}.{}", stem, format.extension()));
            let bytes = match format {
                OutputFormat::Png => rendered.png.as_slice(),
                OutputFormat::Svg => rendered.svg.as_bytes(),
            };
            write_atomic(&path, bytes)?;
            debug!(path = %path.display(), bytes = bytes.len(), "Wrote artifact");
            Ok(path)
        })
        .collect()
}

/// Write through a temporary sibling and rename over `path`, so readers
/// never see a partial file and a failed write leaves the old one intact.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temporary file in {}", parent.display()))?;
    tmp.write_all(bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tmp.persist(path)
        .with_context(|| format!("Failed to move artifact into {}", path.display()))?;

    Ok(())
}
