//! In-memory form of one calendar day of profiler samples.

use std::collections::HashMap;

use crate::grid::AltitudeAxis;

/// A (samples x levels) variable array with its units.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableData {
    /// Row-major values, one row per sample timestamp. Fill values are `NaN`.
    pub values: Vec<f32>,
    /// `units` attribute, if the file declares one.
    pub units: Option<String>,
}

impl VariableData {
    pub fn new(values: Vec<f32>, units: Option<String>) -> Self {
        Self { values, units }
    }
}

/// One day file's samples for one operating mode.
///
/// Everything the assembler needs is extracted up front, so the backing file
/// handle can be closed as soon as a `DaySource` exists.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySource {
    label: String,
    sampling_interval: Option<String>,
    timestamps: Vec<i64>,
    altitude: AltitudeAxis,
    variables: HashMap<String, VariableData>,
}

impl DaySource {
    /// Create a source with no variables yet.
    ///
    /// `label` identifies the source in logs and errors (usually the path).
    pub fn new(label: impl Into<String>, timestamps: Vec<i64>, altitude: AltitudeAxis) -> Self {
        Self {
            label: label.into(),
            sampling_interval: None,
            timestamps,
            altitude,
            variables: HashMap::new(),
        }
    }

    /// Set the raw `sampling_interval` declaration, e.g. `"15 minutes"`.
    pub fn with_sampling_interval(mut self, text: impl Into<String>) -> Self {
        self.sampling_interval = Some(text.into());
        self
    }

    pub fn with_variable(mut self, name: impl Into<String>, data: VariableData) -> Self {
        self.variables.insert(name.into(), data);
        self
    }

    pub fn insert_variable(&mut self, name: impl Into<String>, data: VariableData) {
        self.variables.insert(name.into(), data);
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn sampling_interval(&self) -> Option<&str> {
        self.sampling_interval.as_deref()
    }

    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    pub fn altitude(&self) -> &AltitudeAxis {
        &self.altitude
    }

    pub fn variable(&self, name: &str) -> Option<&VariableData> {
        self.variables.get(name)
    }

    pub fn units(&self, name: &str) -> Option<&str> {
        self.variables.get(name).and_then(|v| v.units.as_deref())
    }

    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    pub fn sample_count(&self) -> usize {
        self.timestamps.len()
    }
}
