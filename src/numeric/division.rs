// ============================================================================
// Rational Division
// Integer divided by SimTime, exact where the fraction allows it
// ============================================================================
//
// x / t = x * 10^-exp / t.raw(). The numerator product may overflow; in that
// case both gcd reductions are tried before falling back to f64. A reduced
// denominator of 1 returns the integer numerator without a float division.

use super::errors::{TimeError, TimeResult};
use super::resolution;
use super::sim_time::SimTime;
use crate::interfaces::{NumericParam, ParamKind};
use std::ops::Div;

/// `x / t` as seconds⁻¹, computed exactly when possible.
pub fn div_i64_by_time(x: i64, t: SimTime) -> f64 {
    let scale = resolution::resolution().map_or(1, |res| res.integer_scale());
    div_i64_scaled(x, scale, t.raw())
}

/// `x / t` for numerators beyond `i64::MAX`.
pub fn div_u64_by_time(x: u64, t: SimTime) -> f64 {
    if let Ok(signed) = i64::try_from(x) {
        return div_i64_by_time(signed, t);
    }
    // halve into the signed range, rounding odd values up except u64::MAX
    let half = if x % 2 == 0 || x == u64::MAX {
        x / 2
    } else {
        x / 2 + 1
    };
    2.0 * div_i64_by_time(half as i64, t)
}

/// `x / t` for a real numerator.
pub fn div_f64_by_time(x: f64, t: SimTime) -> f64 {
    x / t.as_secs_f64()
}

/// `param / t`, dispatching on the parameter's numeric kind.
///
/// # Errors
/// Returns `TypeMismatch` for non-numeric parameters.
pub fn div_param_by_time(param: &dyn NumericParam, t: SimTime) -> TimeResult<f64> {
    let outcome = match param.kind() {
        ParamKind::Int => param.int_value().map(|x| div_i64_by_time(x, t)),
        ParamKind::Double => param.double_value().map(|x| div_f64_by_time(x, t)),
        _ => None,
    };
    outcome.ok_or_else(|| TimeError::TypeMismatch {
        param: param.full_name(),
        kind: param.kind(),
    })
}

pub(crate) fn div_i64_scaled(x: i64, scale: i64, denom: i64) -> f64 {
    let float_fallback = || x as f64 * scale as f64 / denom as f64;

    let (num, denom) = match x.checked_mul(scale) {
        Some(num) => (num, denom),
        None => {
            if denom == 0 {
                return float_fallback();
            }
            let reduced = reduce(x, denom)
                .and_then(|(x, denom)| reduce(scale, denom).map(|(scale, denom)| (x, scale, denom)));
            match reduced.and_then(|(x, scale, denom)| x.checked_mul(scale).map(|num| (num, denom)))
            {
                Some(fraction) => fraction,
                None => return float_fallback(),
            }
        },
    };

    if denom == 1 {
        num as f64
    } else {
        num as f64 / denom as f64
    }
}

/// Divide both terms by their gcd. `None` if the gcd does not fit an i64.
fn reduce(a: i64, b: i64) -> Option<(i64, i64)> {
    let divisor = gcd(a.unsigned_abs(), b.unsigned_abs());
    if divisor <= 1 {
        return Some((a, b));
    }
    let divisor = i64::try_from(divisor).ok()?;
    Some((a / divisor, b / divisor))
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl Div<SimTime> for i64 {
    type Output = f64;

    #[inline]
    fn div(self, rhs: SimTime) -> f64 {
        div_i64_by_time(self, rhs)
    }
}

impl Div<SimTime> for u64 {
    type Output = f64;

    #[inline]
    fn div(self, rhs: SimTime) -> f64 {
        div_u64_by_time(self, rhs)
    }
}

impl Div<SimTime> for f64 {
    type Output = f64;

    #[inline]
    fn div(self, rhs: SimTime) -> f64 {
        div_f64_by_time(self, rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::{Param, ParamValue};
    use crate::numeric::{init_test_resolution, TimeUnit};

    const PS: i64 = 1_000_000_000_000;

    #[test]
    fn test_one_over_three_seconds() {
        init_test_resolution();
        let three = SimTime::new(3, TimeUnit::S).unwrap();
        let result = div_i64_by_time(1, three);
        assert!((result - 0.333_333_333_333_333_3).abs() < 1e-16);
        assert_eq!(1i64 / three, result);
    }

    #[test]
    fn test_exact_quotient_after_reduction() {
        // 7e15 * 10^12 overflows, but the fraction reduces to 1000 * 10^12 / 1
        let x = 7 * 1_000_000_000_000_000;
        let denom = 7 * PS;
        assert_eq!(div_i64_scaled(x, PS, denom), 1_000_000_000_000_000.0);
    }

    #[test]
    fn test_overflow_falls_back_to_float() {
        let result = div_i64_scaled(i64::MAX, PS, 3);
        let expected = i64::MAX as f64 * PS as f64 / 3.0;
        assert_eq!(result, expected);
    }

    #[test]
    fn test_zero_denominator() {
        assert_eq!(div_i64_scaled(5, PS, 0), f64::INFINITY);
        assert_eq!(div_i64_scaled(i64::MAX, PS, 0), f64::INFINITY);
        assert_eq!(div_i64_scaled(-5, PS, 0), f64::NEG_INFINITY);
    }

    #[test]
    fn test_negative_operands() {
        assert_eq!(div_i64_scaled(-6, PS, 2 * PS), -3.0);
        assert_eq!(div_i64_scaled(6, PS, -2 * PS), -3.0);
        assert_eq!(div_i64_scaled(i64::MIN, PS, i64::MIN), PS as f64);
    }

    #[test]
    fn test_unsigned_numerators() {
        init_test_resolution();
        let one = SimTime::new(1, TimeUnit::S).unwrap();
        assert_eq!(div_u64_by_time(10, one), 10.0);

        let big = u64::MAX - 1;
        assert_eq!(div_u64_by_time(big, one), big as f64);
        assert_eq!(div_u64_by_time(u64::MAX, one), 2.0 * (u64::MAX / 2) as f64);

        let odd = (i64::MAX as u64) + 2;
        assert_eq!(div_u64_by_time(odd, one), 2.0 * (odd / 2 + 1) as f64);
    }

    #[test]
    fn test_param_numerators() {
        init_test_resolution();
        let half = SimTime::new(500, TimeUnit::Ms).unwrap();
        let int = Param::new("n", ParamValue::Int(3));
        let real = Param::new("x", ParamValue::Double(1.5));
        assert_eq!(div_param_by_time(&int, half).unwrap(), 6.0);
        assert_eq!(div_param_by_time(&real, half).unwrap(), 3.0);
        assert!(matches!(
            div_param_by_time(&Param::new("b", ParamValue::Bool(false)), half),
            Err(TimeError::TypeMismatch { .. })
        ));
        assert_eq!(2.0f64 / half, 4.0);
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(0, 7), 7);
        assert_eq!(gcd(7, 0), 7);
        assert_eq!(gcd(1 << 63, 1 << 63), 1 << 63);
    }
}
