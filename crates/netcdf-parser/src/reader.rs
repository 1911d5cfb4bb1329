//! Native NetCDF reading using the netcdf library.
//!
//! The file handle lives only inside [`read_day_source`]; everything the
//! assembler needs is copied out before it returns, so the handle is closed
//! even when a later plot step fails.

use std::path::Path;
use std::sync::Once;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use profiler_common::{AltitudeAxis, DaySource, VariableData};
use tracing::{debug, warn};

use crate::error::{NetCdfError, NetCdfResult};

const TIME_VAR: &str = "time";
const ALTITUDE_VAR: &str = "altitude";
const SAMPLING_INTERVAL_ATTR: &str = "sampling_interval";

/// NetCDF default fill for `float`/`double` when no `_FillValue` is declared.
const NC_DEFAULT_FILL: f64 = 9.969_209_968_386_869e36;

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully by the Rust code (e.g., when checking for optional
/// attributes that don't exist). This creates confusing log spam like:
///
/// ```text
/// HDF5-DIAG: Error detected in HDF5 (1.10.8) thread 3:
///   #003: ../../../src/H5Adense.c line 397 in H5A__dense_open(): can't locate attribute in name index
/// ```
///
/// Call this early in `main()`, before the first file is opened. Safe to call
/// more than once.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Read one profiler day file.
///
/// Requested variables that the file does not carry are skipped; the
/// assembler reports them as missing for the plot that needs them. Fill
/// values become `NaN`, and `scale_factor`/`add_offset` are applied.
pub fn read_day_source(path: &Path, variables: &[&str]) -> NetCdfResult<DaySource> {
    silence_hdf5_errors();

    let nc_file = netcdf::open(path).map_err(|e| NetCdfError::OpenFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let timestamps = read_timestamps(&nc_file)?;
    let altitude = read_altitude(&nc_file)?;
    let levels = altitude.len();

    let mut source = DaySource::new(path.display().to_string(), timestamps, altitude);
    if let Some(interval) = get_global_str_attr(&nc_file, SAMPLING_INTERVAL_ATTR) {
        source = source.with_sampling_interval(interval);
    } else {
        warn!(path = %path.display(), "File has no sampling_interval attribute");
    }

    for &name in variables {
        let Some(var) = nc_file.variable(name) else {
            debug!(path = %path.display(), variable = %name, "Variable not in file");
            continue;
        };
        let data = read_profile_variable(&var, name, source.sample_count(), levels)?;
        source.insert_variable(name, data);
    }

    debug!(
        path = %path.display(),
        samples = source.sample_count(),
        levels = levels,
        variables = variables.len(),
        "Read day file"
    );

    Ok(source)
}

/// Parse CF time units like `"seconds since 1970-01-01 00:00:00"`.
///
/// Returns `(seconds per unit, epoch offset of the reference instant)`.
pub fn parse_time_units(units: &str) -> NetCdfResult<(f64, i64)> {
    let (unit, reference) = units
        .split_once(" since ")
        .ok_or_else(|| NetCdfError::InvalidFormat(format!("time units '{}'", units)))?;

    let scale = match unit.trim().to_ascii_lowercase().as_str() {
        "seconds" | "second" | "secs" | "s" => 1.0,
        "minutes" | "minute" | "mins" => 60.0,
        "hours" | "hour" | "h" => 3600.0,
        "days" | "day" | "d" => 86_400.0,
        other => {
            return Err(NetCdfError::InvalidFormat(format!(
                "unsupported time unit '{}'",
                other
            )))
        }
    };

    Ok((scale, parse_reference_instant(reference.trim())?))
}

fn parse_reference_instant(text: &str) -> NetCdfResult<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.timestamp());
    }
    if let Ok(dt) = DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S %:z") {
        return Ok(dt.timestamp());
    }

    let normalized = text.replacen('T', " ", 1);
    let head = normalized.get(..19).unwrap_or(&normalized);
    if let Ok(naive) = NaiveDateTime::parse_from_str(head, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.and_utc().timestamp());
    }

    let date_part = normalized.get(..10).unwrap_or(&normalized);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp())
        .ok_or_else(|| NetCdfError::InvalidFormat(format!("time reference '{}'", text)))
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Sample instants as whole seconds since the epoch, truncated.
fn read_timestamps(nc_file: &netcdf::File) -> NetCdfResult<Vec<i64>> {
    let time_var = nc_file
        .variable(TIME_VAR)
        .ok_or_else(|| NetCdfError::MissingData("time variable".to_string()))?;

    let raw: Vec<f64> = time_var
        .get_values(..)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to read time: {}", e)))?;

    let (scale, offset) = match get_str_attr(&time_var, "units") {
        Some(units) => parse_time_units(&units)?,
        None => (1.0, 0),
    };

    Ok(raw
        .iter()
        .map(|&t| offset + (t * scale).trunc() as i64)
        .collect())
}

fn read_altitude(nc_file: &netcdf::File) -> NetCdfResult<AltitudeAxis> {
    let alt_var = nc_file
        .variable(ALTITUDE_VAR)
        .ok_or_else(|| NetCdfError::MissingData("altitude variable".to_string()))?;

    let levels = nc_file
        .dimension(ALTITUDE_VAR)
        .map(|d| d.len())
        .or_else(|| alt_var.dimensions().last().map(|d| d.len()))
        .ok_or_else(|| NetCdfError::MissingData("altitude dimension".to_string()))?;

    let values: Vec<f32> = alt_var
        .get_values(..)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to read altitude: {}", e)))?;

    match alt_var.dimensions().len() {
        1 => Ok(AltitudeAxis::new(values)),
        // time x altitude: every row repeats the gate heights
        2 if values.len() >= levels => Ok(AltitudeAxis::new(values[..levels].to_vec())),
        n => Err(NetCdfError::InvalidFormat(format!(
            "altitude variable has {} dimensions",
            n
        ))),
    }
}

/// Read a `(time, altitude)` variable into row-major samples x levels.
fn read_profile_variable(
    var: &netcdf::Variable,
    name: &str,
    samples: usize,
    levels: usize,
) -> NetCdfResult<VariableData> {
    let dims: Vec<(String, usize)> = var
        .dimensions()
        .iter()
        .map(|d| (d.name(), d.len()))
        .collect();

    let raw: Vec<f32> = var
        .get_values(..)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to read {}: {}", name, e)))?;

    let scale_factor = get_f64_attr(var, "scale_factor").unwrap_or(1.0);
    let add_offset = get_f64_attr(var, "add_offset").unwrap_or(0.0);
    let fill_value = get_f64_attr(var, "_FillValue").unwrap_or(NC_DEFAULT_FILL);
    let missing_value = get_f64_attr(var, "missing_value");

    let is_fill = |raw: f32| {
        let raw = raw as f64;
        raw.is_nan()
            || same_f32(raw, fill_value)
            || missing_value.map_or(false, |m| same_f32(raw, m))
    };

    let mut values: Vec<f32> = raw
        .iter()
        .map(|&v| {
            if is_fill(v) {
                f32::NAN
            } else {
                (v as f64 * scale_factor + add_offset) as f32
            }
        })
        .collect();

    // Some writers store (altitude, time); bring it to (time, altitude).
    let transposed = matches!(
        dims.as_slice(),
        [(first, _), (second, _)] if first == ALTITUDE_VAR && second == TIME_VAR
    );
    if transposed && values.len() == samples * levels {
        values = transpose(&values, levels, samples);
    }

    let units = get_str_attr(var, "units");
    Ok(VariableData::new(values, units))
}

/// Compare at f32 precision, since data is read as f32.
fn same_f32(a: f64, b: f64) -> bool {
    a as f32 == b as f32
}

/// Transpose a row-major `rows x cols` array.
fn transpose(values: &[f32], rows: usize, cols: usize) -> Vec<f32> {
    let mut out = vec![f32::NAN; values.len()];
    for r in 0..rows {
        for c in 0..cols {
            out[c * rows + r] = values[r * cols + c];
        }
    }
    out
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}

fn get_str_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

fn get_global_str_attr(nc_file: &netcdf::File, name: &str) -> Option<String> {
    if !nc_file.attributes().any(|attr| attr.name() == name) {
        return None;
    }
    match nc_file.attribute(name)?.value().ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}
