// ============================================================================
// Domain Module
// Configuration of the simulation time model
// ============================================================================

pub mod config;

pub use config::{SimTimeConfig, DEFAULT_RESOLUTION, LEGACY_SCALE_OPTION, RESOLUTION_OPTION};
