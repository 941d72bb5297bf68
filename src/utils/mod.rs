// ============================================================================
// Utilities Module
// Run-time budgets and optional log setup
// ============================================================================

#[cfg(feature = "logging")]
mod logging;
mod stopwatch;

#[cfg(feature = "logging")]
pub use logging::init_logging;
pub use stopwatch::Stopwatch;
