// ============================================================================
// Quantities
// Number-with-unit parsing on exact decimals
// ============================================================================

use crate::numeric::{TimeError, TimeResult};
use rust_decimal::Decimal;

/// Time units understood by the parser, with their length in seconds as
/// `mantissa * 10^-scale`.
const TIME_UNITS: [(&str, i64, u32); 10] = [
    ("s", 1, 0),
    ("ms", 1, 3),
    ("us", 1, 6),
    ("ns", 1, 9),
    ("ps", 1, 12),
    ("fs", 1, 15),
    ("as", 1, 18),
    ("min", 60, 0),
    ("h", 3600, 0),
    ("d", 86400, 0),
];

/// A parsed number with an optional unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantity {
    /// Numeric value, expressed in `unit`
    pub value: Decimal,
    /// Unit name, `None` for a bare number
    pub unit: Option<&'static str>,
}

fn lookup(name: &str) -> Option<(&'static str, Decimal)> {
    TIME_UNITS
        .iter()
        .find(|(unit, _, _)| *unit == name)
        .map(|&(unit, mantissa, scale)| (unit, Decimal::new(mantissa, scale)))
}

/// Factor that converts a value in `from` units into `to` units.
///
/// Returns `None` if either unit is unknown.
pub fn conversion_factor(from: &str, to: &str) -> Option<Decimal> {
    let (_, from_secs) = lookup(from)?;
    let (_, to_secs) = lookup(to)?;
    from_secs.checked_div(to_secs)
}

/// Express `value` (in `from` units) in `to` units.
///
/// # Errors
/// Returns `Parse` for unknown units or a result outside the decimal range.
pub fn convert_unit(value: Decimal, from: &str, to: &str) -> TimeResult<Decimal> {
    let factor = conversion_factor(from, to).ok_or_else(|| {
        TimeError::parse(from, format!("cannot convert unit '{}' to '{}'", from, to))
    })?;
    value
        .checked_mul(factor)
        .ok_or_else(|| TimeError::parse(&value.to_string(), format!("out of range in '{}'", to)))
}

/// Parse a quantity such as `"1.5ms"`, `"100 ps"`, `"-2e3"` or `"1min 30s"`.
///
/// A single term keeps its own unit. Several terms must all carry a unit;
/// they are summed and reported in seconds.
///
/// # Errors
/// Returns `Parse` on empty input, malformed numbers, unknown units or
/// trailing text.
pub fn parse_quantity(text: &str) -> TimeResult<Quantity> {
    let mut rest = text.trim();
    if rest.is_empty() {
        return Err(TimeError::parse(text, "empty quantity"));
    }

    let mut terms: Vec<(Decimal, Option<&'static str>)> = Vec::with_capacity(2);
    while !rest.is_empty() {
        let (number, after) =
            split_number(rest).ok_or_else(|| TimeError::parse(text, "expected a number"))?;
        let value = parse_decimal(number).ok_or_else(|| {
            TimeError::parse(text, format!("number '{}' is out of range", number))
        })?;

        let after = after.trim_start();
        let unit_len = after
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(after.len());
        let unit = if unit_len == 0 {
            None
        } else {
            let name = &after[..unit_len];
            let (unit, _) = lookup(name)
                .ok_or_else(|| TimeError::parse(text, format!("unknown unit '{}'", name)))?;
            Some(unit)
        };

        terms.push((value, unit));
        rest = after[unit_len..].trim_start();
    }

    if let [(value, unit)] = terms[..] {
        return Ok(Quantity { value, unit });
    }

    let mut seconds = Decimal::ZERO;
    for (value, unit) in terms {
        let unit = unit.ok_or_else(|| TimeError::parse(text, "missing unit in compound quantity"))?;
        seconds = convert_unit(value, unit, "s")
            .ok()
            .and_then(|s| seconds.checked_add(s))
            .ok_or_else(|| TimeError::parse(text, "quantity is out of range"))?;
    }
    Ok(Quantity {
        value: seconds,
        unit: Some("s"),
    })
}

/// Split off the longest numeric literal at the start of `s`.
fn split_number(s: &str) -> Option<(&str, &str)> {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }
    if digits == 0 {
        return None;
    }

    // exponent only when followed by digits, so "5e" stays a number plus text
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    Some(s.split_at(i))
}

/// Largest power of ten an i128 mantissa can hold.
const MAX_MANTISSA_DIGITS: i64 = 38;

/// Largest scale a `Decimal` accepts.
const MAX_DECIMAL_SCALE: i64 = 28;

/// Build an exact decimal from a literal accepted by `split_number`.
fn parse_decimal(literal: &str) -> Option<Decimal> {
    let (negative, body) = match literal.as_bytes().first() {
        Some(b'-') => (true, &literal[1..]),
        Some(b'+') => (false, &literal[1..]),
        _ => (false, literal),
    };
    let (significand, exponent) = match body.find(['e', 'E']) {
        Some(pos) => (&body[..pos], body[pos + 1..].parse::<i32>().ok()?),
        None => (body, 0),
    };
    let (int_digits, frac_digits) = significand.split_once('.').unwrap_or((significand, ""));
    let int_digits = int_digits.trim_start_matches('0');
    let frac_digits = frac_digits.trim_end_matches('0');

    if int_digits.is_empty() && frac_digits.is_empty() {
        return Some(Decimal::ZERO);
    }
    if (int_digits.len() + frac_digits.len()) as i64 > MAX_MANTISSA_DIGITS + 1 {
        return None;
    }

    let mut mantissa: i128 = 0;
    for digit in int_digits.bytes().chain(frac_digits.bytes()) {
        mantissa = mantissa
            .checked_mul(10)?
            .checked_add(i128::from(digit - b'0'))?;
    }
    if negative {
        mantissa = -mantissa;
    }

    let mut scale = frac_digits.len() as i64 - i64::from(exponent);
    if scale < 0 {
        if -scale > MAX_MANTISSA_DIGITS {
            return None;
        }
        mantissa = mantissa.checked_mul(10i128.checked_pow((-scale) as u32)?)?;
        scale = 0;
    }
    // drop digits beyond what a decimal can hold, only if they are zeros
    if scale > MAX_DECIMAL_SCALE {
        let excess = scale - MAX_DECIMAL_SCALE;
        if excess > MAX_MANTISSA_DIGITS {
            return None;
        }
        let divisor = 10i128.pow(excess as u32);
        if mantissa % divisor != 0 {
            return None;
        }
        mantissa /= divisor;
        scale = MAX_DECIMAL_SCALE;
    }
    Decimal::try_from_i128_with_scale(mantissa, scale as u32).ok()
}
