//! Tolerance string composition for limit tables.
//!
//! A limit row carries a set point and an upper/lower bound as free text
//! (`"10.0"`, `"12.5 mm"`, `"≤ 8"`). [`compose`] turns them into the
//! tolerance notation printed in the report:
//!
//! ```
//! use stepdoc::compose;
//!
//! assert_eq!(compose("10.0", "12.5", "8.0"), "+2.5/-2.0\n(8.0~12.5)");
//! assert_eq!(compose("10", "12", "8"), "+2/-2\n(8~12)");
//! assert_eq!(compose("n/a", "12", "8"), "");
//! ```
//!
//! Arithmetic is done on scaled integers, so the output never depends on
//! float formatting or on the process locale.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

fn number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[-+]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)").unwrap())
}

/// A decimal number as `units × 10^-scale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decimal {
    units: i128,
    scale: u32,
}

/// Longest digit string accepted before a value is treated as unparsable.
const MAX_DIGITS: usize = 30;

impl Decimal {
    /// Parse the first decimal number found in `text`.
    pub fn parse_first(text: &str) -> Option<Self> {
        let found = number_regex().find(text)?.as_str();
        let (negative, body) = match found.as_bytes().first() {
            Some(b'-') => (true, &found[1..]),
            Some(b'+') => (false, &found[1..]),
            _ => (false, found),
        };
        let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
        if int_part.len() + frac_part.len() > MAX_DIGITS {
            return None;
        }

        let mut units: i128 = 0;
        for b in int_part.bytes().chain(frac_part.bytes()) {
            units = units.checked_mul(10)?.checked_add(i128::from(b - b'0'))?;
        }
        Some(Self {
            units: if negative { -units } else { units },
            scale: frac_part.len() as u32,
        })
    }

    /// Number of digits after the decimal point.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    fn rescale(&self, scale: u32) -> Option<i128> {
        let factor = 10i128.checked_pow(scale.checked_sub(self.scale)?)?;
        self.units.checked_mul(factor)
    }

    /// `self - other` at the larger of the two scales.
    pub fn checked_sub(&self, other: &Decimal) -> Option<Decimal> {
        let scale = self.scale.max(other.scale);
        let units = self.rescale(scale)?.checked_sub(other.rescale(scale)?)?;
        Some(Decimal { units, scale })
    }

    /// Drop the fractional part, rounding toward zero.
    pub fn trunc(&self) -> Decimal {
        let divisor = 10i128.pow(self.scale);
        Decimal {
            units: self.units / divisor,
            scale: 0,
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.units < 0 { "-" } else { "" };
        let magnitude = self.units.unsigned_abs();
        if self.scale == 0 {
            return write!(f, "{}{}", sign, magnitude);
        }
        let divisor = 10u128.pow(self.scale);
        write!(
            f,
            "{}{}.{:0width$}",
            sign,
            magnitude / divisor,
            magnitude % divisor,
            width = self.scale as usize
        )
    }
}

/// Count of digits after the decimal point of the first number in `text`.
pub fn significant_decimals(text: &str) -> u32 {
    Decimal::parse_first(text).map(|d| d.scale()).unwrap_or(0)
}

/// Difference `bound - set` at the precision of its operands.
///
/// When neither operand has decimals the result is truncated to an integer.
fn delta(bound: &Decimal, set: &Decimal) -> Option<Decimal> {
    let diff = bound.checked_sub(set)?;
    if bound.scale() == 0 && set.scale() == 0 {
        Some(diff.trunc())
    } else {
        Some(diff)
    }
}

/// Compose the tolerance string for a set point and its bounds.
///
/// Returns an empty string if any of the three texts holds no number.
pub fn compose(set_text: &str, upper_text: &str, lower_text: &str) -> String {
    try_compose(set_text, upper_text, lower_text).unwrap_or_default()
}

fn try_compose(set_text: &str, upper_text: &str, lower_text: &str) -> Option<String> {
    let set = Decimal::parse_first(set_text)?;
    let upper = Decimal::parse_first(upper_text)?;
    let lower = Decimal::parse_first(lower_text)?;

    let plus = delta(&upper, &set)?;
    let minus = delta(&set, &lower)?;

    Some(format!(
        "+{}/-{}\n({}~{})",
        plus,
        minus,
        lower_text.trim(),
        upper_text.trim()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_decimal() {
        assert_eq!(compose("10.0", "12.5", "8.0"), "+2.5/-2.0\n(8.0~12.5)");
    }

    #[test]
    fn test_compose_integer() {
        assert_eq!(compose("10", "12", "8"), "+2/-2\n(8~12)");
    }

    #[test]
    fn test_compose_mixed_precision() {
        assert_eq!(compose("10", "10.25", "9.5"), "+0.25/-0.5\n(9.5~10.25)");
        assert_eq!(compose("0.3", "0.4", "0.1"), "+0.1/-0.2\n(0.1~0.4)");
    }

    #[test]
    fn test_compose_keeps_raw_range_text() {
        assert_eq!(
            compose("25 ℃", "30 ℃", "20 ℃"),
            "+5/-5\n(20 ℃~30 ℃)"
        );
        assert_eq!(compose("1.50mm", "1.6mm", "1.45mm"), "+0.10/-0.05\n(1.45mm~1.6mm)");
    }

    #[test]
    fn test_compose_negative() {
        assert_eq!(compose("-5", "-2", "-10"), "+3/-5\n(-10~-2)");
        assert_eq!(compose("0.5", "-.5", "0"), "+-1.0/-0.5\n(0~-.5)");
    }

    #[test]
    fn test_compose_unparsable_is_empty() {
        assert_eq!(compose("", "12", "8"), "");
        assert_eq!(compose("10", "abc", "8"), "");
        assert_eq!(compose("10", "12", "-"), "");
        assert_eq!(compose("10", "1234567890123456789012345678901234", "8"), "");
    }

    #[test]
    fn test_significant_decimals() {
        assert_eq!(significant_decimals("12.500"), 3);
        assert_eq!(significant_decimals("12"), 0);
        assert_eq!(significant_decimals("12."), 0);
        assert_eq!(significant_decimals("text"), 0);
    }

    #[test]
    fn test_decimal_display() {
        let d = Decimal::parse_first("x -0.05 y").unwrap();
        assert_eq!(d.to_string(), "-0.05");
        assert_eq!(Decimal::parse_first("+7").unwrap().to_string(), "7");
    }
}
