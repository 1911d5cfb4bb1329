//! Per-source timestamp lookup.

use std::collections::HashMap;

use profiler_common::{DaySource, ProfilerError, ProfilerResult, VariableData};

/// A present source with its timestamps indexed for O(1) row lookup.
///
/// Built once per assembly. When a timestamp repeats inside one file the
/// last row in file order is kept.
#[derive(Debug)]
pub struct IndexedSource<'a> {
    source: &'a DaySource,
    rows: HashMap<i64, usize>,
}

impl<'a> IndexedSource<'a> {
    pub fn new(source: &'a DaySource) -> Self {
        let mut rows = HashMap::with_capacity(source.sample_count());
        for (row, &ts) in source.timestamps().iter().enumerate() {
            rows.insert(ts, row);
        }
        Self { source, rows }
    }

    /// Row holding a sample at exactly `timestamp`.
    pub fn row_for(&self, timestamp: i64) -> Option<usize> {
        self.rows.get(&timestamp).copied()
    }

    /// Fetch `name` and check it is shaped samples x `levels`.
    pub fn checked_variable(&self, name: &str, levels: usize) -> ProfilerResult<&'a VariableData> {
        let data = self
            .source
            .variable(name)
            .ok_or_else(|| ProfilerError::MissingVariable {
                variable: name.to_string(),
                source_label: self.source.label().to_string(),
            })?;

        let expected = self.source.sample_count() * levels;
        if data.values.len() != expected {
            return Err(ProfilerError::InvalidShape {
                variable: name.to_string(),
                source_label: self.source.label().to_string(),
                expected,
                actual: data.values.len(),
            });
        }

        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use profiler_common::AltitudeAxis;

    #[test]
    fn test_duplicate_timestamp_keeps_last_row() {
        let source = DaySource::new("dup", vec![0, 900, 900, 1800], AltitudeAxis::new(vec![0.0]));
        let index = IndexedSource::new(&source);
        assert_eq!(index.row_for(0), Some(0));
        assert_eq!(index.row_for(900), Some(2));
        assert_eq!(index.row_for(1800), Some(3));
        assert_eq!(index.row_for(2700), None);
    }

    #[test]
    fn test_checked_variable_shape() {
        let source = DaySource::new("s", vec![0, 900], AltitudeAxis::new(vec![0.0, 1.0]))
            .with_variable("ok", VariableData::new(vec![0.0; 4], None))
            .with_variable("short", VariableData::new(vec![0.0; 3], None));
        let index = IndexedSource::new(&source);

        assert!(index.checked_variable("ok", 2).is_ok());
        assert!(matches!(
            index.checked_variable("short", 2),
            Err(ProfilerError::InvalidShape { expected: 4, actual: 3, .. })
        ));
        assert!(matches!(
            index.checked_variable("absent", 2),
            Err(ProfilerError::MissingVariable { .. })
        ));
    }
}
