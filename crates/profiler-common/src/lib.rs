//! Common types shared across the wind-profiler quick-look crates.

pub mod error;
pub mod grid;
pub mod source;
pub mod time;

pub use error::{ProfilerError, ProfilerResult};
pub use grid::{AltitudeAxis, ProfileGrid};
pub use source::{DaySource, VariableData};
pub use time::{parse_sampling_interval, TimeAxis};
