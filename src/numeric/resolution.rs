// ============================================================================
// Resolution Registry
// Process-wide, set-once scale exponent for simulation time
// ============================================================================

use super::errors::{TimeError, TimeResult};
use crate::units;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::sync::OnceLock;

/// Finest accepted scale exponent (attoseconds).
pub const MIN_SCALE_EXPONENT: i32 = -18;

/// Coarsest accepted scale exponent (seconds).
pub const MAX_SCALE_EXPONENT: i32 = 0;

const MAX_POWER_OF_TEN: usize = 18;

const fn powers_of_ten() -> [i64; MAX_POWER_OF_TEN + 1] {
    let mut table = [1i64; MAX_POWER_OF_TEN + 1];
    let mut i = 1;
    while i <= MAX_POWER_OF_TEN {
        table[i] = table[i - 1] * 10;
        i += 1;
    }
    table
}

const POWERS_OF_TEN: [i64; MAX_POWER_OF_TEN + 1] = powers_of_ten();

/// 10^n for n in 0..=18, `None` when the power does not fit in an i64.
#[inline]
pub(crate) fn exp10(n: i32) -> Option<i64> {
    usize::try_from(n)
        .ok()
        .and_then(|i| POWERS_OF_TEN.get(i).copied())
}

// ============================================================================
// Resolution
// ============================================================================

/// A fixed scale exponent together with its derived constants.
///
/// One tick of a [`SimTime`](super::SimTime) lasts `10^exponent` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    exponent: i32,
    integer_scale: i64,
    real_scale: f64,
    inv_real_scale: f64,
    max_whole_seconds: i64,
}

impl Resolution {
    /// Derive the scale constants for `exponent`.
    ///
    /// # Errors
    /// Returns `ResolutionOutOfRange` unless `exponent` is in -18..=0.
    pub fn new(exponent: i32) -> TimeResult<Self> {
        if !(MIN_SCALE_EXPONENT..=MAX_SCALE_EXPONENT).contains(&exponent) {
            return Err(TimeError::ResolutionOutOfRange { exponent });
        }
        let integer_scale =
            exp10(-exponent).ok_or(TimeError::ResolutionOutOfRange { exponent })?;
        let real_scale = integer_scale as f64;
        Ok(Self {
            exponent,
            integer_scale,
            real_scale,
            inv_real_scale: 1.0 / real_scale,
            max_whole_seconds: i64::MAX / integer_scale,
        })
    }

    /// Base-10 exponent of one tick, in seconds.
    #[inline]
    pub const fn exponent(&self) -> i32 {
        self.exponent
    }

    /// Ticks per second.
    #[inline]
    pub const fn integer_scale(&self) -> i64 {
        self.integer_scale
    }

    /// Ticks per second as f64.
    #[inline]
    pub const fn real_scale(&self) -> f64 {
        self.real_scale
    }

    /// Seconds per tick as f64.
    #[inline]
    pub const fn inv_real_scale(&self) -> f64 {
        self.inv_real_scale
    }

    /// Largest whole number of seconds whose tick count fits in an i64.
    #[inline]
    pub const fn max_whole_seconds(&self) -> i64 {
        self.max_whole_seconds
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Holds a resolution that moves from unset to fixed exactly once.
///
/// The check-and-set runs under a mutex, so concurrent first-time callers
/// agree on a single winner. Reads after that are lock-free.
pub struct ResolutionRegistry {
    guard: Mutex<()>,
    fixed: OnceLock<Resolution>,
}

impl ResolutionRegistry {
    /// Create an unset registry.
    pub const fn new() -> Self {
        Self {
            guard: parking_lot::const_mutex(()),
            fixed: OnceLock::new(),
        }
    }

    /// Fix the scale exponent, or confirm it if it already has this value.
    ///
    /// # Errors
    /// - `ResolutionOutOfRange` if `exponent` is outside -18..=0
    /// - `ResolutionConflict` if a different exponent was fixed earlier
    pub fn set(&self, exponent: i32) -> TimeResult<Resolution> {
        let requested = Resolution::new(exponent)?;

        let _guard = self.guard.lock();
        if let Some(current) = self.fixed.get() {
            if current.exponent == exponent {
                tracing::debug!(exponent, "simulation time resolution already set");
                return Ok(*current);
            }
            return Err(TimeError::ResolutionConflict {
                current: current.exponent,
                requested: exponent,
            });
        }

        let fixed = *self.fixed.get_or_init(|| requested);
        tracing::info!(
            exponent,
            max_whole_seconds = fixed.max_whole_seconds,
            "simulation time resolution fixed"
        );
        Ok(fixed)
    }

    /// The fixed resolution, if any.
    #[inline]
    pub fn get(&self) -> Option<Resolution> {
        self.fixed.get().copied()
    }

    /// The fixed scale exponent, if any.
    #[inline]
    pub fn exponent(&self) -> Option<i32> {
        self.fixed.get().map(|r| r.exponent)
    }
}

impl Default for ResolutionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL: ResolutionRegistry = ResolutionRegistry::new();

/// Fix the process-wide simulation time resolution.
///
/// Repeating the call with the same exponent is a no-op.
pub fn set_resolution(exponent: i32) -> TimeResult<Resolution> {
    GLOBAL.set(exponent)
}

/// The process-wide resolution, `None` until [`set_resolution`] succeeds.
#[inline]
pub fn resolution() -> Option<Resolution> {
    GLOBAL.get()
}

/// The process-wide scale exponent, `None` until it is fixed.
#[inline]
pub fn scale_exponent() -> Option<i32> {
    GLOBAL.exponent()
}

/// The process-wide resolution, or `UninitializedResolution` describing the
/// value that needed it.
pub(crate) fn require(describe: impl FnOnce() -> String) -> TimeResult<Resolution> {
    resolution().ok_or_else(|| TimeError::UninitializedResolution { value: describe() })
}

// ============================================================================
// Resolution Specifications
// ============================================================================

const SPEC_SYNTAX: &str = "expected a second-or-smaller time unit (s, ms, us, ns, ps, fs or as), \
     a power-of-ten multiple of such a unit (e.g. 100ms), or a base-10 scale exponent \
     in the -18..0 range";

/// Turn a resolution specification into a scale exponent.
///
/// Accepts a bare unit (`"us"`), a bare exponent (`"-9"`) or a power-of-ten
/// quantity (`"100ps"`). The exponent is not range-checked here;
/// [`set_resolution`] does that.
///
/// # Errors
/// Returns `Parse` for anything else, including quantities that are not an
/// exact power of ten seconds.
pub fn parse_resolution_spec(text: &str) -> TimeResult<i32> {
    let spec = text.trim();
    let invalid = |details: &str| TimeError::parse(text, format!("{} ({})", SPEC_SYNTAX, details));

    let starts_alpha = spec.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
    if starts_alpha {
        let factor = units::conversion_factor(spec, "s").ok_or_else(|| invalid("unknown unit"))?;
        return exact_log10(factor).ok_or_else(|| invalid("not a power of ten"));
    }

    if let Ok(exponent) = spec.parse::<i32>() {
        return Ok(exponent);
    }

    let quantity = units::parse_quantity(spec).map_err(|e| invalid(&e.to_string()))?;
    let seconds = match quantity.unit {
        Some(unit) => units::convert_unit(quantity.value, unit, "s")
            .map_err(|e| invalid(&e.to_string()))?,
        None => quantity.value,
    };
    exact_log10(seconds).ok_or_else(|| invalid("not a power of ten"))
}

/// `Some(n)` when `value` is exactly `10^n`.
fn exact_log10(value: Decimal) -> Option<i32> {
    if value <= Decimal::ZERO {
        return None;
    }
    let normalized = value.normalize();
    let mut mantissa = normalized.mantissa();
    let mut exponent = -(normalized.scale() as i32);
    while mantissa % 10 == 0 {
        mantissa /= 10;
        exponent += 1;
    }
    (mantissa == 1).then_some(exponent)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_powers_of_ten() {
        assert_eq!(exp10(0), Some(1));
        assert_eq!(exp10(12), Some(1_000_000_000_000));
        assert_eq!(exp10(18), Some(1_000_000_000_000_000_000));
        assert_eq!(exp10(19), None);
        assert_eq!(exp10(-1), None);
    }

    #[test]
    fn test_resolution_constants() {
        let ps = Resolution::new(-12).unwrap();
        assert_eq!(ps.exponent(), -12);
        assert_eq!(ps.integer_scale(), 1_000_000_000_000);
        assert_eq!(ps.real_scale(), 1e12);
        assert_eq!(ps.inv_real_scale(), 1e-12);
        assert_eq!(ps.max_whole_seconds(), 9_223_372);

        let s = Resolution::new(0).unwrap();
        assert_eq!(s.integer_scale(), 1);
        assert_eq!(s.max_whole_seconds(), i64::MAX);
    }

    #[test]
    fn test_resolution_out_of_range() {
        assert_eq!(
            Resolution::new(1),
            Err(TimeError::ResolutionOutOfRange { exponent: 1 })
        );
        let registry = ResolutionRegistry::new();
        assert_eq!(
            registry.set(-19).unwrap_err(),
            TimeError::ResolutionOutOfRange { exponent: -19 }
        );
        assert_eq!(registry.exponent(), None);
    }

    #[test]
    fn test_set_once_for_every_exponent() {
        for exponent in MIN_SCALE_EXPONENT..=MAX_SCALE_EXPONENT {
            let registry = ResolutionRegistry::new();
            assert!(registry.get().is_none());
            registry.set(exponent).unwrap();
            registry.set(exponent).unwrap();

            let other = if exponent == 0 { -1 } else { exponent + 1 };
            assert_eq!(
                registry.set(other).unwrap_err(),
                TimeError::ResolutionConflict {
                    current: exponent,
                    requested: other
                }
            );
            assert_eq!(registry.exponent(), Some(exponent));
        }
    }

    #[test]
    fn test_concurrent_first_set_has_one_winner() {
        let registry = Arc::new(ResolutionRegistry::new());
        let outcomes: Vec<(i32, bool)> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let registry = Arc::clone(&registry);
                    let exponent = -3 * (i % 4);
                    scope.spawn(move || (exponent, registry.set(exponent).is_ok()))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let winner = registry.exponent().unwrap();
        for (exponent, ok) in outcomes {
            assert_eq!(ok, exponent == winner);
        }
    }

    #[test]
    fn test_parse_unit_only() {
        assert_eq!(parse_resolution_spec("s").unwrap(), 0);
        assert_eq!(parse_resolution_spec("ms").unwrap(), -3);
        assert_eq!(parse_resolution_spec("us").unwrap(), -6);
        assert_eq!(parse_resolution_spec("ps").unwrap(), -12);
        assert_eq!(parse_resolution_spec("as").unwrap(), -18);
    }

    #[test]
    fn test_parse_bare_exponent() {
        assert_eq!(parse_resolution_spec("-12").unwrap(), -12);
        assert_eq!(parse_resolution_spec("0").unwrap(), 0);
        assert_eq!(parse_resolution_spec(" -7 ").unwrap(), -7);
    }

    #[test]
    fn test_parse_number_with_unit() {
        assert_eq!(parse_resolution_spec("100ps").unwrap(), -10);
        assert_eq!(parse_resolution_spec("10ms").unwrap(), -2);
        assert_eq!(parse_resolution_spec("1000as").unwrap(), -15);
        assert_eq!(parse_resolution_spec("0.1s").unwrap(), -1);
    }

    #[test]
    fn test_parse_invalid_specs() {
        for spec in ["min", "xs", "250us", "3ms", "", "12 apples", "1.5"] {
            assert!(
                matches!(parse_resolution_spec(spec), Err(TimeError::Parse { .. })),
                "{spec:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_exact_log10() {
        assert_eq!(exact_log10(Decimal::new(1, 12)), Some(-12));
        assert_eq!(exact_log10(Decimal::new(1000, 0)), Some(3));
        assert_eq!(exact_log10(Decimal::new(100, 2)), Some(0));
        assert_eq!(exact_log10(Decimal::new(2, 3)), None);
        assert_eq!(exact_log10(Decimal::ZERO), None);
        assert_eq!(exact_log10(Decimal::new(-10, 0)), None);
    }
}
