//! Fixed-precision decimal values and numeric literal helpers

use crate::error::{Error, Result};
use crate::schema::MAX_DECIMAL_PRECISION;
use std::cmp::Ordering;
use std::fmt;

/// Exact decimal stored as an unscaled 128-bit integer
///
/// The represented value is `unscaled * 10^-scale`, with at most
/// `precision` significant digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal {
    unscaled: i128,
    precision: u8,
    scale: u8,
}

impl Decimal {
    /// Create a decimal, checking that the digits fit the precision
    pub fn new(unscaled: i128, precision: u8, scale: u8) -> Result<Self> {
        let fits = (1..=MAX_DECIMAL_PRECISION).contains(&precision)
            && scale <= precision
            && digit_count(unscaled) <= u32::from(precision);
        if !fits {
            return Err(Error::DecimalOverflow {
                literal: unscaled.to_string(),
                precision,
                scale,
            });
        }
        Ok(Self {
            unscaled,
            precision,
            scale,
        })
    }

    /// Parse a numeric literal and round it HALF_UP to the given scale
    pub fn from_literal(literal: &str, precision: u8, scale: u8) -> Result<Self> {
        let overflow = || Error::DecimalOverflow {
            literal: literal.to_string(),
            precision,
            scale,
        };
        let parsed = ParsedLiteral::parse(literal).ok_or_else(overflow)?;
        let unscaled = rescale(parsed.unscaled, parsed.scale, i32::from(scale)).ok_or_else(overflow)?;
        Self::new(unscaled, precision, scale).map_err(|_| overflow())
    }

    /// Unscaled integer value
    pub fn unscaled(&self) -> i128 {
        self.unscaled
    }

    /// Declared precision
    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Declared scale
    pub fn scale(&self) -> u8 {
        self.scale
    }

    /// Approximate value as a double
    #[allow(clippy::cast_precision_loss)]
    pub fn to_f64(&self) -> f64 {
        self.unscaled as f64 / 10f64.powi(i32::from(self.scale))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.unscaled.unsigned_abs().to_string();
        let scale = usize::from(self.scale);
        if self.unscaled < 0 {
            write!(f, "-")?;
        }
        if scale == 0 {
            write!(f, "{digits}")
        } else if digits.len() > scale {
            let (int_part, frac_part) = digits.split_at(digits.len() - scale);
            write!(f, "{int_part}.{frac_part}")
        } else {
            write!(f, "0.{}{digits}", "0".repeat(scale - digits.len()))
        }
    }
}

/// Numeric literal split into an unscaled integer and a (possibly negative) scale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ParsedLiteral {
    pub unscaled: i128,
    pub scale: i32,
}

impl ParsedLiteral {
    /// Parse `[-+]digits[.digits][(e|E)[-+]digits]`; `None` if malformed or wider than 128 bits
    pub fn parse(literal: &str) -> Option<Self> {
        let (mantissa, exponent) = match literal.find(['e', 'E']) {
            Some(pos) => (&literal[..pos], literal[pos + 1..].parse::<i32>().ok()?),
            None => (literal, 0),
        };
        let (negative, digits) = match mantissa.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, mantissa.strip_prefix('+').unwrap_or(mantissa)),
        };
        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return None;
        }

        let mut unscaled: i128 = 0;
        for c in int_part.chars().chain(frac_part.chars()) {
            let digit = c.to_digit(10)?;
            unscaled = unscaled.checked_mul(10)?.checked_add(i128::from(digit))?;
        }
        let scale = i32::try_from(frac_part.len()).ok()?.checked_sub(exponent)?;

        Some(Self {
            unscaled: if negative { -unscaled } else { unscaled },
            scale,
        })
    }

    /// Smallest decimal type that holds this literal exactly
    pub fn decimal_type(&self) -> Option<(u8, u8)> {
        let scale = u8::try_from(self.scale).ok()?;
        let precision = digit_count(self.unscaled).max(u32::from(scale));
        if precision > u32::from(MAX_DECIMAL_PRECISION) {
            return None;
        }
        Some((precision as u8, scale))
    }
}

/// Check if a numeric literal has no fraction or exponent
pub(crate) fn is_integral_literal(literal: &str) -> bool {
    !literal.contains(['.', 'e', 'E'])
}

/// Significant digits of an integral literal, ignoring sign and leading zeros
pub(crate) fn integral_digits(literal: &str) -> usize {
    let digits = literal.trim_start_matches(['-', '+']).trim_start_matches('0');
    digits.len().max(1)
}

fn digit_count(value: i128) -> u32 {
    match value.unsigned_abs() {
        0 => 1,
        v => v.ilog10() + 1,
    }
}

fn rescale(unscaled: i128, from: i32, to: i32) -> Option<i128> {
    match from.cmp(&to) {
        Ordering::Equal => Some(unscaled),
        Ordering::Less => {
            let factor = 10i128.checked_pow(u32::try_from(to - from).ok()?)?;
            unscaled.checked_mul(factor)
        }
        Ordering::Greater => {
            let diff = u32::try_from(from - to).ok()?;
            if diff > u32::from(MAX_DECIMAL_PRECISION) {
                return Some(0);
            }
            let factor = 10i128.pow(diff);
            let quotient = unscaled / factor;
            let remainder = unscaled % factor;
            if remainder.unsigned_abs() * 2 >= factor.unsigned_abs() {
                Some(quotient + unscaled.signum())
            } else {
                Some(quotient)
            }
        }
    }
}
