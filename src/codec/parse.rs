// ============================================================================
// Parsing
// Quantity text to SimTime, through exact decimal conversion
// ============================================================================

use crate::numeric::{overflow_at, require, OverflowSource, Resolution, SimTime, TimeError, TimeResult};
use crate::units;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

impl SimTime {
    /// Parse a quantity such as `"1.5ms"`, `"100ps"` or `"1min 30s"`.
    ///
    /// A bare number is taken as seconds. The value is rounded to the
    /// nearest tick.
    ///
    /// # Errors
    /// - `Parse` for malformed text or unknown units
    /// - `UninitializedResolution` for a nonzero value before the resolution is fixed
    /// - `Overflow` if the value is outside the tick range
    pub fn parse(text: &str) -> TimeResult<Self> {
        let quantity = units::parse_quantity(text)?;
        let seconds = match quantity.unit {
            Some(unit) => units::convert_unit(quantity.value, unit, "s")?,
            None => quantity.value,
        };
        if seconds.is_zero() {
            return Ok(Self::ZERO);
        }
        let res = require(|| text.trim().to_string())?;
        Self::from_decimal_seconds_at(&res, seconds, text)
    }

    pub(crate) fn from_decimal_seconds_at(
        res: &Resolution,
        seconds: Decimal,
        text: &str,
    ) -> TimeResult<Self> {
        seconds
            .checked_mul(Decimal::from(res.integer_scale()))
            .and_then(|ticks| ticks.checked_add(Decimal::new(5, 1)))
            .and_then(|ticks| ticks.floor().to_i64())
            .map(Self::from_raw)
            .ok_or_else(|| {
                overflow_at(
                    Some(res),
                    OverflowSource::RealSeconds,
                    format!("converting \"{}\"", text.trim()),
                )
            })
    }

    /// Parse the time literal at the start of `text`.
    ///
    /// Skips leading whitespace, then takes the longest run of ASCII
    /// alphanumerics, whitespace, `+`, `-` and `.`. Returns the value and the
    /// byte offset just past the consumed text. Input that is only
    /// whitespace yields zero with nothing consumed.
    pub fn parse_prefix(text: &str) -> TimeResult<(Self, usize)> {
        let start = text.len() - text.trim_start().len();
        if start == text.len() {
            return Ok((Self::ZERO, 0));
        }

        let end = text[start..]
            .char_indices()
            .find(|&(_, c)| {
                !(c.is_ascii_alphanumeric() || c.is_ascii_whitespace() || matches!(c, '+' | '-' | '.'))
            })
            .map_or(text.len(), |(i, _)| start + i);

        let value = Self::parse(&text[..end])?;
        Ok((value, end))
    }
}

impl FromStr for SimTime {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{init_test_resolution, TimeUnit};

    fn at(exponent: i32) -> Resolution {
        Resolution::new(exponent).unwrap()
    }

    #[test]
    fn test_parse_units() {
        init_test_resolution();
        assert_eq!(SimTime::parse("100ps").unwrap().raw(), 100);
        assert_eq!(SimTime::parse("1.5ms").unwrap(), SimTime::new(1_500, TimeUnit::Us).unwrap());
        assert_eq!(SimTime::parse("2").unwrap(), SimTime::from_seconds(2).unwrap());
        assert_eq!(SimTime::parse("-3 ns").unwrap().raw(), -3_000);
        assert_eq!(SimTime::parse("1min 30s").unwrap(), SimTime::from_seconds(90).unwrap());
        assert_eq!("250us".parse::<SimTime>().unwrap().raw(), 250_000_000);
    }

    #[test]
    fn test_parse_zero_and_errors() {
        init_test_resolution();
        assert_eq!(SimTime::parse("0ms").unwrap(), SimTime::ZERO);
        assert!(matches!(SimTime::parse("abc"), Err(TimeError::Parse { .. })));
        assert!(matches!(SimTime::parse("5 light-years"), Err(TimeError::Parse { .. })));
        assert!(SimTime::parse("1000d").unwrap_err().is_overflow());
    }

    #[test]
    fn test_decimal_seconds_rounding() {
        let ms = at(-3);
        let parse = |s: &str| {
            let q = units::parse_quantity(s).unwrap();
            let secs = units::convert_unit(q.value, q.unit.unwrap_or("s"), "s").unwrap();
            SimTime::from_decimal_seconds_at(&ms, secs, s)
        };
        assert_eq!(parse("1.2345").unwrap().raw(), 1_235);
        assert_eq!(parse("-0.0015").unwrap().raw(), -1);
        assert_eq!(parse("1ns").unwrap().raw(), 0);
        assert_eq!(parse("9223372036854775.807").unwrap().raw(), i64::MAX);
        assert!(parse("9223372036854775.808").unwrap_err().is_overflow());
    }

    #[test]
    fn test_parse_prefix() {
        init_test_resolution();
        assert_eq!(SimTime::parse_prefix("   ").unwrap(), (SimTime::ZERO, 0));
        assert_eq!(SimTime::parse_prefix("").unwrap(), (SimTime::ZERO, 0));

        let (value, end) = SimTime::parse_prefix("  5ms, rest").unwrap();
        assert_eq!(value, SimTime::new(5, TimeUnit::Ms).unwrap());
        assert_eq!(end, 5);

        let text = "1s 500ms)";
        let (value, end) = SimTime::parse_prefix(text).unwrap();
        assert_eq!(value, SimTime::new(1_500, TimeUnit::Ms).unwrap());
        assert_eq!(&text[end..], ")");

        assert!(SimTime::parse_prefix("x9;").is_err());
    }

    #[test]
    fn test_round_trip_through_ustr() {
        init_test_resolution();
        for raw in [1, -7, 1_500, 999_999_999_999, i64::MAX, i64::MIN + 1] {
            let value = SimTime::from_raw(raw);
            assert_eq!(SimTime::parse(&value.ustr()).unwrap(), value);
        }
    }
}
