// ============================================================================
// Simulation Time Configuration
// Resolution options read from the process-wide configuration source
// ============================================================================

use crate::numeric::{
    parse_resolution_spec, set_resolution, TimeError, TimeResult, MAX_SCALE_EXPONENT,
    MIN_SCALE_EXPONENT,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Name of the resolution option.
pub const RESOLUTION_OPTION: &str = "simtime-resolution";

/// Name of the deprecated integer exponent option.
pub const LEGACY_SCALE_OPTION: &str = "simtime-scale";

/// Resolution used when neither option is given: picoseconds, ~106 days.
pub const DEFAULT_RESOLUTION: &str = "ps";

/// Configuration for the simulation time resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub struct SimTimeConfig {
    /// Resolution specification: a unit (`"us"`), a power-of-ten quantity
    /// (`"100ps"`) or an exponent (`"-12"`)
    pub resolution: Option<String>,

    /// Deprecated: bare scale exponent, used only when `resolution` is absent
    pub scale: Option<i32>,
}

impl SimTimeConfig {
    /// Create an empty configuration (picosecond default)
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: Set the resolution specification
    pub fn with_resolution(mut self, spec: impl Into<String>) -> Self {
        self.resolution = Some(spec.into());
        self
    }

    /// Builder method: Set the deprecated scale exponent
    pub fn with_legacy_scale(mut self, exponent: i32) -> Self {
        self.scale = Some(exponent);
        self
    }

    /// The scale exponent this configuration selects, without applying it.
    ///
    /// # Errors
    /// Returns `Parse` for a malformed resolution specification.
    pub fn exponent(&self) -> TimeResult<i32> {
        match (&self.resolution, self.scale) {
            (Some(spec), _) => parse_resolution_spec(spec),
            (None, Some(exponent)) => Ok(exponent),
            (None, None) => parse_resolution_spec(DEFAULT_RESOLUTION),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> TimeResult<()> {
        let exponent = self.exponent()?;
        if !(MIN_SCALE_EXPONENT..=MAX_SCALE_EXPONENT).contains(&exponent) {
            return Err(TimeError::ResolutionOutOfRange { exponent });
        }
        Ok(())
    }

    /// Fix the process-wide resolution from this configuration.
    ///
    /// Returns the applied exponent. Warns when the deprecated option is
    /// present, even if the new option overrides it.
    pub fn configure(&self) -> TimeResult<i32> {
        let exponent = self.exponent()?;
        set_resolution(exponent)?;

        if self.scale.is_some() {
            tracing::warn!(
                "obsolete config option {}= found, please use {}= instead \
                 (it allows values like \"us\" or \"100ps\" in addition to base-10 scale exponents)",
                LEGACY_SCALE_OPTION,
                RESOLUTION_OPTION
            );
        }
        Ok(exponent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::init_test_resolution;

    #[test]
    fn test_default_is_picoseconds() {
        let config = SimTimeConfig::new();
        assert_eq!(config.exponent().unwrap(), -12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolution_wins_over_legacy_scale() {
        let config = SimTimeConfig::new()
            .with_legacy_scale(-3)
            .with_resolution("ns");
        assert_eq!(config.exponent().unwrap(), -9);

        let legacy = SimTimeConfig::new().with_legacy_scale(-6);
        assert_eq!(legacy.exponent().unwrap(), -6);
    }

    #[test]
    fn test_validation() {
        assert!(SimTimeConfig::new().with_resolution("1s").validate().is_ok());
        assert_eq!(
            SimTimeConfig::new().with_resolution("10s").validate(),
            Err(TimeError::ResolutionOutOfRange { exponent: 1 })
        );
        assert!(matches!(
            SimTimeConfig::new().with_resolution("fortnight").validate(),
            Err(TimeError::Parse { .. })
        ));
        assert_eq!(
            SimTimeConfig::new().with_legacy_scale(-20).validate(),
            Err(TimeError::ResolutionOutOfRange { exponent: -20 })
        );
    }

    #[test]
    fn test_configure_is_idempotent_and_detects_conflicts() {
        init_test_resolution();
        assert_eq!(SimTimeConfig::new().configure().unwrap(), -12);
        assert_eq!(SimTimeConfig::new().with_legacy_scale(-12).configure().unwrap(), -12);
        assert_eq!(
            SimTimeConfig::new().with_resolution("us").configure(),
            Err(TimeError::ResolutionConflict {
                current: -12,
                requested: -6
            })
        );
    }
}
