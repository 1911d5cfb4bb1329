//! Exact-timestamp join of daily sources onto a synthetic time axis.

use profiler_common::{
    parse_sampling_interval, AltitudeAxis, DaySource, ProfileGrid, ProfilerError, ProfilerResult,
    TimeAxis,
};
use tracing::{debug, warn};

use crate::index::IndexedSource;

/// Maximum per-level difference (metres) for two altitude axes to be treated
/// as the same axis.
pub const ALTITUDE_TOLERANCE_M: f32 = 1e-3;

/// Cadence used when no source is present to declare one.
pub const FALLBACK_CADENCE_MINUTES: u32 = 15;

/// Several variables assembled against one time axis and one source set.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub time_axis: TimeAxis,
    pub altitude: AltitudeAxis,
    /// True when no source was present and `altitude` is the 9-level default.
    pub altitude_is_fallback: bool,
    /// One grid per requested name, in request order.
    pub grids: Vec<ProfileGrid>,
}

impl Assembly {
    pub fn grid(&self, name: &str) -> Option<&ProfileGrid> {
        self.grids.iter().find(|g| g.name() == name)
    }

    /// True when every cell of every grid is missing.
    pub fn is_empty(&self) -> bool {
        self.grids.iter().all(ProfileGrid::is_all_missing)
    }
}

/// Present sources, newest first.
fn newest_first(sources: &[Option<DaySource>]) -> impl Iterator<Item = &DaySource> {
    sources.iter().rev().flatten()
}

/// Cadence in minutes declared by the newest present source.
///
/// Older sources that declare a different cadence only produce a warning;
/// the assembly proceeds on the newest source's cadence. With no present
/// source, `fallback_minutes` is returned.
pub fn resolve_cadence(sources: &[Option<DaySource>], fallback_minutes: u32) -> ProfilerResult<u32> {
    let mut present = newest_first(sources);
    let Some(newest) = present.next() else {
        debug!(cadence = fallback_minutes, "No sources present, using fallback cadence");
        return Ok(fallback_minutes);
    };

    let cadence = declared_cadence(newest)?;

    for older in present {
        match older.sampling_interval().and_then(parse_sampling_interval) {
            Some(other) if other != cadence => {
                warn!(
                    source = %older.label(),
                    declared = other,
                    used = cadence,
                    "Source declares a different cadence; newest source wins"
                );
            }
            Some(_) => {}
            None => {
                warn!(
                    source = %older.label(),
                    value = older.sampling_interval().unwrap_or(""),
                    "Unreadable sampling interval in older source"
                );
            }
        }
    }

    Ok(cadence)
}

fn declared_cadence(source: &DaySource) -> ProfilerResult<u32> {
    let text = source.sampling_interval().unwrap_or("");
    parse_sampling_interval(text).ok_or_else(|| ProfilerError::MalformedCadence {
        source_label: source.label().to_string(),
        value: text.to_string(),
    })
}

/// Altitude axis of the newest present source, after checking every other
/// present source agrees with it. `None` when no source is present.
pub fn resolve_altitude(sources: &[Option<DaySource>]) -> ProfilerResult<Option<&AltitudeAxis>> {
    let mut present = newest_first(sources);
    let Some(newest) = present.next() else {
        return Ok(None);
    };
    let axis = newest.altitude();

    for older in present {
        if !older.altitude().matches(axis, ALTITUDE_TOLERANCE_M) {
            return Err(ProfilerError::ShapeMismatch(format!(
                "altitude axis of {} ({} levels) differs from {} ({} levels)",
                older.label(),
                older.altitude().len(),
                newest.label(),
                axis.len()
            )));
        }
    }

    Ok(Some(axis))
}

/// Assemble one variable onto `axis`.
///
/// `sources` is ordered oldest to newest; `None` marks an absent day. For
/// each axis timestamp the present sources are consulted newest first and the
/// first exact match supplies the whole altitude row.
pub fn assemble(
    variable: &str,
    axis: &TimeAxis,
    sources: &[Option<DaySource>],
) -> ProfilerResult<ProfileGrid> {
    let assembly = assemble_many(&[variable], axis, sources)?;
    assembly
        .grids
        .into_iter()
        .next()
        .ok_or_else(|| ProfilerError::ShapeMismatch(format!("no grid assembled for {}", variable)))
}

/// Assemble several variables against the same axis and source set.
///
/// Sources are indexed once and shared by every variable.
pub fn assemble_many(
    variables: &[&str],
    axis: &TimeAxis,
    sources: &[Option<DaySource>],
) -> ProfilerResult<Assembly> {
    let (altitude, altitude_is_fallback) = match resolve_altitude(sources)? {
        Some(axis) => (axis.clone(), false),
        None => (AltitudeAxis::fallback(), true),
    };

    let indexed: Vec<IndexedSource<'_>> = newest_first(sources).map(IndexedSource::new).collect();

    let grids = variables
        .iter()
        .map(|name| join_variable(name, axis, &indexed, altitude.len()))
        .collect::<ProfilerResult<Vec<_>>>()?;

    Ok(Assembly {
        time_axis: axis.clone(),
        altitude,
        altitude_is_fallback,
        grids,
    })
}

fn join_variable(
    name: &str,
    axis: &TimeAxis,
    indexed: &[IndexedSource<'_>],
    levels: usize,
) -> ProfilerResult<ProfileGrid> {
    let arrays = indexed
        .iter()
        .map(|source| source.checked_variable(name, levels))
        .collect::<ProfilerResult<Vec<_>>>()?;

    let mut grid = ProfileGrid::missing(name, axis.len(), levels);
    let mut matched = 0usize;

    for (slot, &ts) in axis.timestamps().iter().enumerate() {
        for (source, data) in indexed.iter().zip(&arrays) {
            if let Some(row) = source.row_for(ts) {
                let start = row * levels;
                grid.set_row(slot, &data.values[start..start + levels]);
                matched += 1;
                break;
            }
        }
    }

    // Newest source carrying units names them.
    grid.set_units(arrays.iter().find_map(|data| data.units.clone()));

    debug!(
        variable = %name,
        sources = indexed.len(),
        slots = axis.len(),
        matched = matched,
        "Assembled grid"
    );

    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use profiler_common::VariableData;

    fn source(label: &str, interval: &str, levels: Vec<f32>) -> DaySource {
        DaySource::new(label, vec![0], AltitudeAxis::new(levels)).with_sampling_interval(interval)
    }

    #[test]
    fn test_newest_first_skips_absent() {
        let sources = vec![
            Some(source("a", "15 minutes", vec![0.0])),
            None,
            Some(source("c", "15 minutes", vec![0.0])),
        ];
        let labels: Vec<_> = newest_first(&sources).map(DaySource::label).collect();
        assert_eq!(labels, vec!["c", "a"]);
    }

    #[test]
    fn test_declared_cadence_missing_attribute() {
        let src = DaySource::new("bare", vec![0], AltitudeAxis::new(vec![0.0]));
        assert!(matches!(
            declared_cadence(&src),
            Err(ProfilerError::MalformedCadence { .. })
        ));
    }

    #[test]
    fn test_units_from_newest_source_with_units() {
        let old = source("old", "15 minutes", vec![0.0])
            .with_variable("w", VariableData::new(vec![1.0], Some("m s-1".into())));
        let new = source("new", "15 minutes", vec![0.0])
            .with_variable("w", VariableData::new(vec![2.0], None));
        let axis = TimeAxis::from_range(15, 0, 0);
        let grid = assemble("w", &axis, &[Some(old), Some(new)]).unwrap();
        assert_eq!(grid.units(), Some("m s-1"));
        assert_eq!(grid.get(0, 0), Some(2.0));
    }
}
