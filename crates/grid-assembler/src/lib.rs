//! Time-grid assembly for wind-profiler day files.
//!
//! Turns zero to three daily sources into regular time x altitude grids on a
//! synthetic, fixed-cadence time axis, and derives wind vectors from
//! speed/direction pairs.
//!
//! # Architecture
//!
//! ```text
//! now, cadence, window_days
//!      │
//!      ▼
//! build_axis() ──► TimeAxis (latest_floor - window .. latest_floor)
//!      │
//!      ▼
//! assemble(name, axis, [day-2, day-1, today])
//!      │
//!      ├─► index each present source once (timestamp -> row)
//!      │
//!      ├─► newest present source defines the altitude axis
//!      │         (all others must agree, else ShapeMismatch)
//!      │
//!      └─► per axis slot: consult sources newest first, copy first match
//!               │
//!               ▼
//!          ProfileGrid (NaN = missing)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use grid_assembler::{assemble_many, build_axis, resolve_cadence};
//!
//! let sources = [yesterday, today];
//! let cadence = resolve_cadence(&sources, 15)?;
//! let axis = build_axis(cadence, 1, Utc::now())?;
//! let assembly = assemble_many(&["wind_speed", "wind_from_direction"], &axis, &sources)?;
//! ```

pub mod assemble;
pub mod axis;
pub mod index;
pub mod wind;

pub use assemble::{
    assemble, assemble_many, resolve_altitude, resolve_cadence, Assembly, ALTITUDE_TOLERANCE_M,
    FALLBACK_CADENCE_MINUTES,
};
pub use axis::{build_axis, build_day_axis, latest_floor};
pub use index::IndexedSource;
pub use profiler_common::{ProfilerError, ProfilerResult};
pub use wind::{
    derive_wind_components, normalize_arrow, normalize_arrows, uv_to_speed_direction,
    WindComponents,
};
