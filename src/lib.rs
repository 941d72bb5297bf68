// ============================================================================
// Simulation Time Library
// Fixed-point simulation time with a process-wide, set-once resolution
// ============================================================================

//! # SimTime
//!
//! A 64-bit fixed-point time value for discrete-event simulation.
//!
//! ## Features
//!
//! - **Set-once resolution** from seconds down to attoseconds (`10^-18 s`)
//! - **Exact rescaling** between units; precision loss and overflow are errors
//! - **Restore-on-failure arithmetic**: a failed in-place update leaves the value intact
//! - **Lossless text codec**: `"1.5ms"` style output that parses back to the same ticks
//! - **Stopwatch** for wall-clock and CPU-time budgets
//!
//! ## Example
//!
//! ```rust
//! use simtime::prelude::*;
//!
//! // Fix picosecond resolution once per process
//! set_resolution(-12).unwrap();
//!
//! let t = SimTime::new(1_500, TimeUnit::Ms).unwrap();
//! assert_eq!(t.raw(), 1_500_000_000_000);
//! assert_eq!(t.ustr(), "1.5s");
//!
//! let d: SimTime = "100ps".parse().unwrap();
//! assert_eq!(d.raw(), 100);
//!
//! let (secs, rest) = t.split(TimeUnit::S).unwrap();
//! assert_eq!((secs, rest.ustr()), (1, "500ms".to_string()));
//!
//! // A failed addition leaves the receiver untouched
//! let mut max = SimTime::max_time();
//! assert!(max.checked_add_assign(t).is_err());
//! assert_eq!(max, SimTime::max_time());
//! ```

pub mod codec;
pub mod domain;
pub mod interfaces;
pub mod numeric;
pub mod units;
pub mod utils;

// Re-exports for convenience
pub mod prelude {
    pub use crate::codec::FormatOptions;
    pub use crate::domain::SimTimeConfig;
    pub use crate::interfaces::{NumericParam, Param, ParamKind, ParamValue};
    pub use crate::numeric::{
        div_i64_by_time, div_u64_by_time, parse_resolution_spec, resolution, scale_exponent,
        set_resolution, OverflowSource, Resolution, SimTime, TimeError, TimeResult, TimeUnit,
    };
    pub use crate::utils::Stopwatch;
}
