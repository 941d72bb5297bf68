// ============================================================================
// Numeric Module
// Fixed-point simulation time and its process-wide resolution
// ============================================================================
//
// This module provides:
// - Resolution / set_resolution: the set-once scale exponent (-18..=0)
// - SimTime: i64 tick count, overflow-checked arithmetic and rescaling
// - TimeUnit: s, ms, us, ns, ps, fs, as
// - div_i64_by_time and friends: integer / SimTime without needless rounding
// - TimeError: one variant per failure kind
//
// Design principles:
// - Exact integer rescaling; precision loss and overflow are errors
// - All fallible arithmetic returns Result, failed in-place updates leave
//   the receiver untouched
// - The resolution is written once under a lock and read lock-free

mod division;
mod errors;
mod resolution;
mod sim_time;

pub use division::{div_f64_by_time, div_i64_by_time, div_param_by_time, div_u64_by_time};
pub use errors::{OverflowSource, TimeError, TimeResult};
pub use resolution::{
    parse_resolution_spec, resolution, scale_exponent, set_resolution, Resolution,
    ResolutionRegistry, MAX_SCALE_EXPONENT, MIN_SCALE_EXPONENT,
};
pub use sim_time::{SimTime, TimeUnit};

pub(crate) use resolution::{exp10, require};
pub(crate) use sim_time::overflow_at;

/// Unit tests share one process, so they all run at picosecond resolution.
#[cfg(test)]
pub(crate) fn init_test_resolution() {
    set_resolution(-12).expect("unit tests run at picosecond resolution");
}
