//! Loading day files for a run.

use std::path::Path;

use anyhow::{Context, Result};
use netcdf_parser::read_day_source;
use profiler_common::DaySource;
use tracing::{debug, warn};

/// Reads one day file, if it can be had.
///
/// `Ok(None)` means the day is absent: the file does not exist or could not
/// be opened. Errors are reserved for files that opened but could not be
/// read.
pub trait SourceLoader {
    fn load(&self, path: &Path, variables: &[&str]) -> Result<Option<DaySource>>;
}

impl<T: SourceLoader + ?Sized> SourceLoader for &T {
    fn load(&self, path: &Path, variables: &[&str]) -> Result<Option<DaySource>> {
        (**self).load(path, variables)
    }
}

/// Loads day files from local NetCDF.
#[derive(Debug, Default, Clone, Copy)]
pub struct NetCdfLoader;

impl SourceLoader for NetCdfLoader {
    fn load(&self, path: &Path, variables: &[&str]) -> Result<Option<DaySource>> {
        if !path.exists() {
            debug!(path = %path.display(), "Source file not present");
            return Ok(None);
        }

        match read_day_source(path, variables) {
            Ok(source) => Ok(Some(source)),
            Err(e) if e.is_open_failure() => {
                warn!(path = %path.display(), error = %e, "Could not open source file, treating as absent");
                Ok(None)
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }
}
