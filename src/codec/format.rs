// ============================================================================
// Formatting
// Compact unit strings and fully configurable digit output for SimTime
// ============================================================================

use crate::numeric::{exp10, scale_exponent, SimTime, TimeUnit};
use arrayvec::ArrayString;
use std::fmt::Write;

/// Name of the unit with the given exponent; callers pass multiples of 3 in -18..=0.
fn unit_name(exponent: i32) -> &'static str {
    TimeUnit::from_exponent(exponent).map_or("", TimeUnit::name)
}

/// Decimal digits of `|raw|`; u64::MAX has 20 digits.
fn abs_digits(raw: i64) -> ArrayString<20> {
    let mut digits = ArrayString::new();
    // cannot fail: capacity covers every u64
    let _ = write!(digits, "{}", raw.unsigned_abs());
    digits
}

/// `raw * 10^exponent` as a plain decimal without trailing zeros.
pub(crate) fn ttoa(raw: i64, exponent: i32) -> String {
    if raw == 0 {
        return "0".to_string();
    }
    let digits = abs_digits(raw);
    let mut out = String::with_capacity(digits.len() + 24);
    if raw < 0 {
        out.push('-');
    }

    if exponent >= 0 {
        out.push_str(&digits);
        out.extend(std::iter::repeat('0').take(exponent as usize));
        return out;
    }

    let frac_len = exponent.unsigned_abs() as usize;
    let (int_part, frac_part) = if digits.len() > frac_len {
        digits.split_at(digits.len() - frac_len)
    } else {
        ("", digits.as_str())
    };
    let leading_zeros = frac_len - frac_part.len();
    let frac_part = frac_part.trim_end_matches('0');

    out.push_str(if int_part.is_empty() { "0" } else { int_part });
    if !frac_part.is_empty() {
        out.push('.');
        out.extend(std::iter::repeat('0').take(leading_zeros));
        out.push_str(frac_part);
    }
    out
}

pub(crate) fn ustr_at(raw: i64, scale_exp: i32) -> String {
    if raw == 0 {
        return "0s".to_string();
    }
    let magnitude = raw.unsigned_abs();
    let mut unit_exp = 0;
    while unit_exp > scale_exp
        && exp10(unit_exp - scale_exp).is_some_and(|p| magnitude < p as u64)
    {
        unit_exp -= 3;
    }
    ustr_in_at(raw, scale_exp, unit_exp)
}

pub(crate) fn ustr_in_at(raw: i64, scale_exp: i32, unit_exp: i32) -> String {
    let mut out = ttoa(raw, scale_exp - unit_exp);
    out.push_str(unit_name(unit_exp));
    out
}

// ============================================================================
// Format Options
// ============================================================================

/// Layout for [`SimTime::format`].
///
/// ```ignore
/// let opts = FormatOptions::new()
///     .with_precision(-6)
///     .with_digit_separator("_")
///     .with_units(" ", " ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    precision: Option<i32>,
    decimal_separator: String,
    digit_separator: Option<String>,
    units: Option<(String, String)>,
}

impl FormatOptions {
    /// Print down to the resolution, `.` as decimal separator, no grouping.
    pub fn new() -> Self {
        Self {
            precision: None,
            decimal_separator: ".".to_string(),
            digit_separator: None,
            units: None,
        }
    }

    /// Most negative decimal place to print (0 = whole seconds).
    ///
    /// Clamped to `resolution..=0` when formatting.
    pub fn with_precision(mut self, precision: i32) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn with_decimal_separator(mut self, separator: &str) -> Self {
        self.decimal_separator = separator.to_string();
        self
    }

    /// Separator between groups of three digits; empty disables grouping.
    pub fn with_digit_separator(mut self, separator: &str) -> Self {
        self.digit_separator = (!separator.is_empty()).then(|| separator.to_string());
        self
    }

    /// Annotate each three-digit group with its unit, wrapped in `before`/`after`.
    pub fn with_units(mut self, before: &str, after: &str) -> Self {
        self.units = Some((before.to_string(), after.to_string()));
        self
    }
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn format_at(raw: i64, scale_exp: i32, opts: &FormatOptions) -> String {
    let prec = opts.precision.unwrap_or(scale_exp).clamp(scale_exp, 0);

    let digits = abs_digits(raw);
    let digits = digits.as_bytes();
    let num_digits = digits.len() as i32;

    let mut out = String::with_capacity(64);
    if raw < 0 {
        out.push('-');
    }

    // decimal place of the most significant digit; seconds are always printed
    let top = scale_exp + num_digits - 1;
    let start = top.max(0);
    let mut end = prec;
    if end % 3 != 0 && (opts.units.is_some() || opts.digit_separator.is_some()) {
        // rounds down: -1 and -2 both become -3
        end = 3 * ((end - 2) / 3);
    }

    for place in (end..=start).rev() {
        let index = top - place;
        let digit = if (0..num_digits).contains(&index) {
            digits[index as usize] as char
        } else {
            '0'
        };
        out.push(digit);

        if place % 3 != 0 {
            continue;
        }
        match &opts.units {
            Some((before, after)) if (-18..=0).contains(&place) => {
                out.push_str(before);
                out.push_str(unit_name(place));
                out.push_str(after);
            },
            _ if place == 0 => {
                if end < 0 {
                    out.push_str(&opts.decimal_separator);
                }
            },
            _ => {
                if let Some(separator) = &opts.digit_separator {
                    if place != end {
                        out.push_str(separator);
                    }
                }
            },
        }
    }
    out
}

// ============================================================================
// SimTime Formatting API
// ============================================================================

fn current_exponent() -> i32 {
    scale_exponent().unwrap_or(0)
}

impl SimTime {
    /// Compact form in the coarsest unit that keeps a nonzero integer part,
    /// e.g. `"1.5s"`, `"250us"`; zero is `"0s"`.
    pub fn ustr(self) -> String {
        ustr_at(self.raw(), current_exponent())
    }

    /// Compact form in a fixed unit, e.g. `"0.0015s"` for 1.5ms in seconds.
    pub fn ustr_in(self, unit: TimeUnit) -> String {
        ustr_in_at(self.raw(), current_exponent(), unit.exponent())
    }

    /// Full digit output with separators and optional unit annotations.
    pub fn format(self, options: &FormatOptions) -> String {
        format_at(self.raw(), current_exponent(), options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::init_test_resolution;

    #[test]
    fn test_ttoa() {
        assert_eq!(ttoa(0, -12), "0");
        assert_eq!(ttoa(1_500, -3), "1.5");
        assert_eq!(ttoa(1_000, -3), "1");
        assert_eq!(ttoa(-5, -3), "-0.005");
        assert_eq!(ttoa(120, 2), "12000");
        assert_eq!(ttoa(i64::MAX, -12), "9223372.036854775807");
        assert_eq!(ttoa(i64::MIN, -12), "-9223372.036854775808");
        assert_eq!(ttoa(42, 0), "42");
    }

    #[test]
    fn test_ustr_picks_coarsest_unit() {
        assert_eq!(ustr_at(0, -12), "0s");
        assert_eq!(ustr_at(1_000_000_000_000, -12), "1s");
        assert_eq!(ustr_at(1_500_000_000_000, -12), "1.5s");
        assert_eq!(ustr_at(999_000_000_000, -12), "999ms");
        assert_eq!(ustr_at(-250_000_000, -12), "-250us");
        assert_eq!(ustr_at(1_500, -12), "1.5ns");
        assert_eq!(ustr_at(7, -12), "7ps");
        assert_eq!(ustr_at(7, -18), "7as");
        assert_eq!(ustr_at(i64::MAX, -12), "9223372.036854775807s");
    }

    #[test]
    fn test_ustr_never_finer_than_resolution() {
        assert_eq!(ustr_at(5, -3), "5ms");
        assert_eq!(ustr_at(5, 0), "5s");
        // exponent -4 steps past ms to us
        assert_eq!(ustr_at(5, -4), "500us");
    }

    #[test]
    fn test_ustr_in_fixed_unit() {
        assert_eq!(ustr_in_at(1_500_000_000, -12, -3), "1.5ms");
        assert_eq!(ustr_in_at(1_500_000_000, -12, 0), "0.0015s");
        assert_eq!(ustr_in_at(3, -3, -9), "3000000ns");
    }

    #[test]
    fn test_format_plain() {
        let opts = FormatOptions::new();
        assert_eq!(format_at(1_500, -3, &opts), "1.500");
        assert_eq!(format_at(0, -3, &opts), "0.000");
        assert_eq!(format_at(-25, -3, &opts), "-0.025");
        assert_eq!(format_at(1_234_567, -3, &opts.clone().with_precision(0)), "1234");
        assert_eq!(
            format_at(1_234_567, -3, &opts.clone().with_decimal_separator(",")),
            "1234,567"
        );
    }

    #[test]
    fn test_format_precision_is_clamped() {
        let opts = FormatOptions::new().with_precision(-9);
        assert_eq!(format_at(1_500, -3, &opts), "1.500");
        let opts = FormatOptions::new().with_precision(4);
        assert_eq!(format_at(1_500, -3, &opts), "1");
    }

    #[test]
    fn test_format_digit_grouping() {
        let opts = FormatOptions::new().with_digit_separator("_");
        assert_eq!(format_at(1_234_567_891, -6, &opts), "1_234.567_891");

        // -1 rounds down to -3 when grouping
        let opts = opts.with_precision(-1);
        assert_eq!(format_at(1_234_567_891, -6, &opts), "1_234.567");
    }

    #[test]
    fn test_format_with_units() {
        let opts = FormatOptions::new().with_units("", " ");
        assert_eq!(format_at(1_234_567_891, -9, &opts), "1s 234ms 567us 891ns ");

        let opts = opts.with_precision(-2);
        assert_eq!(format_at(1_234_567_891, -9, &opts), "1s 234ms ");

        let opts = FormatOptions::new().with_units("", "").with_digit_separator(",");
        assert_eq!(format_at(12_345_000, -3, &opts), "12,345s000ms");
    }

    #[test]
    fn test_empty_digit_separator_disables_grouping() {
        let opts = FormatOptions::new().with_digit_separator("").with_precision(-1);
        assert_eq!(format_at(1_234_567, -3, &opts), "1234.5");
    }

    #[test]
    fn test_simtime_formatting_api() {
        init_test_resolution();
        let t = SimTime::new(1, TimeUnit::S).unwrap();
        assert_eq!(t.ustr(), "1s");
        assert_eq!(t.ustr_in(TimeUnit::Ms), "1000ms");
        assert_eq!(
            t.format(&FormatOptions::new().with_precision(-3)),
            "1.000"
        );
        assert_eq!(SimTime::ZERO.ustr(), "0s");
    }
}
