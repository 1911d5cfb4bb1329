//! NetCDF reader for radar wind-profiler day files.
//!
//! Each file holds one UTC day of samples for one operating mode, laid out
//! as `time x altitude`:
//!
//! ```text
//! dimensions:
//!     time = UNLIMITED ;
//!     altitude = 60 ;
//! variables:
//!     double time(time) ;              seconds since 1970-01-01
//!     float altitude(altitude) ;       or altitude(time, altitude)
//!     float wind_speed(time, altitude) ;
//!         wind_speed:units = "m s-1" ;
//!         wind_speed:_FillValue = -1.e+20f ;
//! // global attributes:
//!     :sampling_interval = "15 minutes" ;
//! ```
//!
//! [`read_day_source`] pulls the requested variables out into a
//! [`DaySource`](profiler_common::DaySource) and closes the file before
//! returning.
//!
//! System requirements: libhdf5-dev libnetcdf-dev

pub mod error;
pub mod reader;

pub use error::{NetCdfError, NetCdfResult};
pub use reader::{parse_time_units, read_day_source, silence_hdf5_errors};
