// ============================================================================
// Simulation Time
// 64-bit fixed-point time value scaled by the process-wide resolution
// ============================================================================

use super::errors::{OverflowSource, TimeError, TimeResult};
use super::resolution::{self, exp10, Resolution};
use crate::codec;
use crate::interfaces::NumericParam;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

// ============================================================================
// Time Units
// ============================================================================

/// Second-or-smaller time units, stepping by three decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    S,
    Ms,
    Us,
    Ns,
    Ps,
    Fs,
    As,
}

impl TimeUnit {
    /// All units from seconds down to attoseconds.
    pub const ALL: [TimeUnit; 7] = [
        TimeUnit::S,
        TimeUnit::Ms,
        TimeUnit::Us,
        TimeUnit::Ns,
        TimeUnit::Ps,
        TimeUnit::Fs,
        TimeUnit::As,
    ];

    /// Base-10 exponent of the unit in seconds (0, -3, ..., -18).
    #[inline]
    pub const fn exponent(self) -> i32 {
        match self {
            TimeUnit::S => 0,
            TimeUnit::Ms => -3,
            TimeUnit::Us => -6,
            TimeUnit::Ns => -9,
            TimeUnit::Ps => -12,
            TimeUnit::Fs => -15,
            TimeUnit::As => -18,
        }
    }

    /// Short unit name as used in text (`"ms"`, `"us"`, ...).
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            TimeUnit::S => "s",
            TimeUnit::Ms => "ms",
            TimeUnit::Us => "us",
            TimeUnit::Ns => "ns",
            TimeUnit::Ps => "ps",
            TimeUnit::Fs => "fs",
            TimeUnit::As => "as",
        }
    }

    /// Look up a unit by its short name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|unit| unit.name() == name)
    }

    /// Look up a unit by its exponent.
    pub fn from_exponent(exponent: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|unit| unit.exponent() == exponent)
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// SimTime
// ============================================================================

/// Simulation time as a signed count of ticks.
///
/// One tick lasts `10^exponent` seconds, where the exponent is the
/// process-wide resolution fixed through
/// [`set_resolution`](super::set_resolution). Zero is valid at any time;
/// every other constructor needs the resolution to be fixed first.
///
/// All fallible operations return [`TimeResult`] and never clamp or wrap.
/// The operator impls (`+`, `-`, `*`, ...) panic where the checked
/// counterpart would return an error.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct SimTime(i64);

impl SimTime {
    /// Zero, valid under any resolution.
    pub const ZERO: Self = Self(0);

    // ========================================================================
    // Construction
    // ========================================================================

    /// Create from a raw tick count.
    #[inline]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// The largest representable value.
    #[inline]
    pub const fn max_time() -> Self {
        Self(i64::MAX)
    }

    /// Create `value * 10^unit.exponent()` seconds.
    ///
    /// # Errors
    /// - `UninitializedResolution` for a nonzero value before the resolution is fixed
    /// - `PrecisionLoss` if the unit is finer than the resolution and the value
    ///   is not a whole number of ticks
    /// - `Overflow` if the tick count does not fit in an i64
    pub fn new(value: i64, unit: TimeUnit) -> TimeResult<Self> {
        if value == 0 {
            return Ok(Self::ZERO);
        }
        let res = resolution::require(|| format!("{}{}", value, unit))?;
        Self::from_units_at(&res, value, unit.exponent())
    }

    pub(crate) fn from_units_at(res: &Resolution, value: i64, unit_exp: i32) -> TimeResult<Self> {
        let diff = unit_exp - res.exponent();
        match diff.cmp(&0) {
            Ordering::Less => match exp10(-diff) {
                Some(divisor) if value % divisor == 0 => Ok(Self(value / divisor)),
                _ => Err(TimeError::PrecisionLoss {
                    value,
                    unit_exponent: unit_exp,
                    scale_exponent: res.exponent(),
                }),
            },
            Ordering::Greater => exp10(diff)
                .and_then(|multiplier| value.checked_mul(multiplier))
                .map(Self)
                .ok_or_else(|| {
                    overflow_at(
                        Some(res),
                        OverflowSource::UnitRescale,
                        format!("representing {}*10^{}s", value, unit_exp),
                    )
                }),
            Ordering::Equal => Ok(Self(value)),
        }
    }

    /// Create from a real number of seconds, rounded to the nearest tick.
    ///
    /// # Errors
    /// - `UninitializedResolution` for a nonzero value before the resolution is fixed
    /// - `Overflow` if the value is outside the tick range (or not finite)
    pub fn from_seconds_f64(seconds: f64) -> TimeResult<Self> {
        if seconds == 0.0 {
            return Ok(Self::ZERO);
        }
        let res = resolution::require(|| format!("{}", seconds))?;
        Self::from_seconds_f64_at(&res, seconds)
    }

    pub(crate) fn from_seconds_f64_at(res: &Resolution, seconds: f64) -> TimeResult<Self> {
        ticks_from_f64(seconds * res.real_scale())
            .map(Self)
            .ok_or_else(|| {
                overflow_at(
                    Some(res),
                    OverflowSource::RealSeconds,
                    format!("converting {}", seconds),
                )
            })
    }

    /// Create from a whole number of seconds.
    ///
    /// # Errors
    /// - `UninitializedResolution` for a nonzero value before the resolution is fixed
    /// - `Overflow` if `|seconds|` exceeds the resolution's whole-second range
    pub fn from_seconds(seconds: i64) -> TimeResult<Self> {
        if seconds == 0 {
            return Ok(Self::ZERO);
        }
        let res = resolution::require(|| format!("{}s", seconds))?;
        Self::from_seconds_at(&res, seconds)
    }

    pub(crate) fn from_seconds_at(res: &Resolution, seconds: i64) -> TimeResult<Self> {
        if seconds.unsigned_abs() > res.max_whole_seconds().unsigned_abs() {
            return Err(overflow_at(
                Some(res),
                OverflowSource::WholeSeconds,
                format!("converting {}s", seconds),
            ));
        }
        Ok(Self(seconds * res.integer_scale()))
    }

    /// Create from a generic numeric parameter.
    ///
    /// Integer parameters are whole seconds, real parameters are seconds.
    ///
    /// # Errors
    /// `TypeMismatch` for non-numeric parameters, otherwise as the
    /// corresponding constructor.
    pub fn try_from_param(param: &dyn NumericParam) -> TimeResult<Self> {
        dispatch_param(
            param,
            |value| Self::new(value, TimeUnit::S),
            Self::from_seconds_f64,
        )
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The raw tick count.
    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// The value in seconds as f64.
    pub fn as_secs_f64(self) -> f64 {
        match resolution::resolution() {
            Some(res) => self.0 as f64 / res.real_scale(),
            None => self.0 as f64,
        }
    }

    // ========================================================================
    // Unit Conversion
    // ========================================================================

    /// The value as a whole count of `unit`, truncated toward zero.
    ///
    /// # Errors
    /// `Overflow` if the unit is finer than the resolution and the count
    /// does not fit in an i64.
    pub fn in_unit(self, unit: TimeUnit) -> TimeResult<i64> {
        if self.0 == 0 {
            return Ok(0);
        }
        let res = resolution::require(|| format!("raw {}", self.0))?;
        self.in_unit_at(&res, unit.exponent())
    }

    pub(crate) fn in_unit_at(self, res: &Resolution, unit_exp: i32) -> TimeResult<i64> {
        let diff = unit_exp - res.exponent();
        match diff.cmp(&0) {
            // i64 division already truncates toward zero
            Ordering::Greater => Ok(exp10(diff).map_or(0, |divisor| self.0 / divisor)),
            Ordering::Less => exp10(-diff)
                .and_then(|multiplier| self.0.checked_mul(multiplier))
                .ok_or_else(|| {
                    overflow_at(
                        Some(res),
                        OverflowSource::UnitRescale,
                        format!(
                            "representing {} in units of 10^{}s",
                            codec::ttoa(self.0, res.exponent()),
                            unit_exp
                        ),
                    )
                }),
            Ordering::Equal => Ok(self.0),
        }
    }

    /// Split into a whole count of `unit` and the remainder, so that
    /// `self == count * unit + remainder`.
    pub fn split(self, unit: TimeUnit) -> TimeResult<(i64, SimTime)> {
        if self.0 == 0 {
            return Ok((0, Self::ZERO));
        }
        let res = resolution::require(|| format!("raw {}", self.0))?;
        self.split_at(&res, unit.exponent())
    }

    pub(crate) fn split_at(self, res: &Resolution, unit_exp: i32) -> TimeResult<(i64, SimTime)> {
        let count = self.in_unit_at(res, unit_exp)?;
        let whole = Self::from_units_at(res, count, unit_exp)?;
        Ok((count, self.checked_sub(whole)?))
    }

    // ========================================================================
    // Arithmetic Operations
    // ========================================================================

    /// Checked addition.
    ///
    /// # Errors
    /// Returns `Overflow` if the result is out of range.
    #[inline]
    pub fn checked_add(self, rhs: Self) -> TimeResult<Self> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or_else(|| arithmetic_overflow(format!("adding {} to {}", rhs, self)))
    }

    /// Checked subtraction.
    ///
    /// # Errors
    /// Returns `Overflow` if the result is out of range.
    #[inline]
    pub fn checked_sub(self, rhs: Self) -> TimeResult<Self> {
        self.0
            .checked_sub(rhs.0)
            .map(Self)
            .ok_or_else(|| arithmetic_overflow(format!("subtracting {} from {}", rhs, self)))
    }

    /// In-place addition; `self` is untouched when it fails.
    pub fn checked_add_assign(&mut self, rhs: Self) -> TimeResult<()> {
        *self = self.checked_add(rhs)?;
        Ok(())
    }

    /// In-place subtraction; `self` is untouched when it fails.
    pub fn checked_sub_assign(&mut self, rhs: Self) -> TimeResult<()> {
        *self = self.checked_sub(rhs)?;
        Ok(())
    }

    /// Checked negation.
    ///
    /// # Errors
    /// Returns `NegationOverflow` for the raw value `i64::MIN`.
    #[inline]
    pub fn checked_neg(self) -> TimeResult<Self> {
        self.0
            .checked_neg()
            .map(Self)
            .ok_or_else(|| TimeError::NegationOverflow {
                value: self.to_string(),
            })
    }

    /// Absolute value.
    #[inline]
    pub fn abs(self) -> TimeResult<Self> {
        if self.0 < 0 {
            self.checked_neg()
        } else {
            Ok(self)
        }
    }

    /// Multiply by an integer.
    ///
    /// # Errors
    /// Returns `Overflow` if the result is out of range.
    #[inline]
    pub fn checked_mul(self, rhs: i64) -> TimeResult<Self> {
        self.0
            .checked_mul(rhs)
            .map(Self)
            .ok_or_else(|| arithmetic_overflow(format!("multiplying {} by {}", self, rhs)))
    }

    /// In-place multiplication; `self` is untouched when it fails.
    pub fn checked_mul_assign(&mut self, rhs: i64) -> TimeResult<()> {
        *self = self.checked_mul(rhs)?;
        Ok(())
    }

    /// Multiply by a real factor, rounding to the nearest tick.
    ///
    /// # Errors
    /// Returns `Overflow` if the result is out of range or not finite.
    pub fn checked_mul_f64(self, rhs: f64) -> TimeResult<Self> {
        ticks_from_f64(self.0 as f64 * rhs)
            .map(Self)
            .ok_or_else(|| arithmetic_overflow(format!("multiplying {} by {}", self, rhs)))
    }

    /// Divide by an integer, truncating toward zero.
    ///
    /// # Errors
    /// - `DivisionByZero` if `rhs` is 0
    /// - `Overflow` for `i64::MIN` ticks divided by -1
    pub fn checked_div(self, rhs: i64) -> TimeResult<Self> {
        if rhs == 0 {
            return Err(TimeError::DivisionByZero);
        }
        self.0
            .checked_div(rhs)
            .map(Self)
            .ok_or_else(|| arithmetic_overflow(format!("dividing {} by {}", self, rhs)))
    }

    /// Divide by a real divisor, rounding to the nearest tick.
    ///
    /// # Errors
    /// - `DivisionByZero` if `rhs` is zero
    /// - `Overflow` if the result is out of range or not finite
    pub fn checked_div_f64(self, rhs: f64) -> TimeResult<Self> {
        if rhs == 0.0 {
            return Err(TimeError::DivisionByZero);
        }
        ticks_from_f64(self.0 as f64 / rhs)
            .map(Self)
            .ok_or_else(|| arithmetic_overflow(format!("dividing {} by {}", self, rhs)))
    }

    /// Multiply by a generic numeric parameter.
    pub fn checked_mul_param(self, param: &dyn NumericParam) -> TimeResult<Self> {
        dispatch_param(
            param,
            |value| self.checked_mul(value),
            |value| self.checked_mul_f64(value),
        )
    }

    /// Divide by a generic numeric parameter.
    pub fn checked_div_param(self, param: &dyn NumericParam) -> TimeResult<Self> {
        dispatch_param(
            param,
            |value| self.checked_div(value),
            |value| self.checked_div_f64(value),
        )
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// 2^63 as f64; `i64::MAX as f64` rounds up to this value.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Round a real tick count half-up, `None` if it does not fit an i64.
#[inline]
fn ticks_from_f64(ticks: f64) -> Option<i64> {
    let rounded = (ticks + 0.5).floor();
    // also rejects NaN
    if rounded.abs() < I64_LIMIT {
        Some(rounded as i64)
    } else {
        None
    }
}

fn dispatch_param<T>(
    param: &dyn NumericParam,
    on_int: impl FnOnce(i64) -> TimeResult<T>,
    on_double: impl FnOnce(f64) -> TimeResult<T>,
) -> TimeResult<T> {
    use crate::interfaces::ParamKind;

    let outcome = match param.kind() {
        ParamKind::Int => param.int_value().map(on_int),
        ParamKind::Double => param.double_value().map(on_double),
        _ => None,
    };
    outcome.unwrap_or_else(|| {
        Err(TimeError::TypeMismatch {
            param: param.full_name(),
            kind: param.kind(),
        })
    })
}

/// The representable range as `(-max,max)` in seconds.
pub(crate) fn range_text(res: Option<&Resolution>) -> String {
    match res {
        Some(res) => {
            let max = codec::ttoa(i64::MAX, res.exponent());
            format!("(-{},{})", max, max)
        },
        None => "(undefined, resolution not set)".to_string(),
    }
}

pub(crate) fn overflow_at(
    res: Option<&Resolution>,
    source: OverflowSource,
    detail: String,
) -> TimeError {
    TimeError::Overflow {
        source,
        detail,
        range: range_text(res),
        scale_exponent: res.map(Resolution::exponent),
    }
}

fn arithmetic_overflow(detail: String) -> TimeError {
    overflow_at(
        resolution::resolution().as_ref(),
        OverflowSource::Arithmetic,
        detail,
    )
}

// ============================================================================
// Trait Implementations
// ============================================================================

// Operators panic on overflow - use checked_* where failures must be handled
impl Add for SimTime {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        self.checked_add(rhs).unwrap_or_else(|e| panic!("{}", e))
    }
}

impl Sub for SimTime {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.checked_sub(rhs).unwrap_or_else(|e| panic!("{}", e))
    }
}

impl AddAssign for SimTime {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for SimTime {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for SimTime {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        self.checked_neg().unwrap_or_else(|e| panic!("{}", e))
    }
}

impl Mul<i64> for SimTime {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: i64) -> Self::Output {
        self.checked_mul(rhs).unwrap_or_else(|e| panic!("{}", e))
    }
}

impl Mul<f64> for SimTime {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self::Output {
        self.checked_mul_f64(rhs).unwrap_or_else(|e| panic!("{}", e))
    }
}

impl Div<i64> for SimTime {
    type Output = Self;

    #[inline]
    fn div(self, rhs: i64) -> Self::Output {
        self.checked_div(rhs).unwrap_or_else(|e| panic!("{}", e))
    }
}

impl Div<f64> for SimTime {
    type Output = Self;

    #[inline]
    fn div(self, rhs: f64) -> Self::Output {
        self.checked_div_f64(rhs).unwrap_or_else(|e| panic!("{}", e))
    }
}

/// Ratio of two times.
impl Div for SimTime {
    type Output = f64;

    #[inline]
    fn div(self, rhs: Self) -> f64 {
        self.0 as f64 / rhs.0 as f64
    }
}

// ============================================================================
// Display and Debug
// ============================================================================

impl fmt::Display for SimTime {
    /// Plain decimal seconds without trailing zeros, e.g. `1.5`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let exponent = resolution::scale_exponent().unwrap_or(0);
        f.write_str(&codec::ttoa(self.0, exponent))
    }
}

impl fmt::Debug for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SimTime({}s, raw={})", self, self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================
