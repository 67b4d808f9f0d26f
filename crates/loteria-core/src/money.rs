//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing a cash drawer in binary floating point:                        │
//! │    3×1 + 2×0.50 + 1×0.05  can print as 4.0499999…  ❌                   │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    3×100 + 2×50 + 1×5 = 405 centavos = R$ 4,05                         │
//! │    Every coin value is an exact integer, so every sum is exact          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use loteria_core::money::Money;
//!
//! // Create from centavos (preferred)
//! let price = Money::from_cents(250); // R$ 2,50
//!
//! // Or parse an exact decimal string (labels, config files)
//! let coin = Money::parse_decimal("0.05").unwrap();
//! assert_eq!(coin.cents(), 5);
//!
//! let total = price * 3 + coin;
//! assert_eq!(total.to_string(), "R$ 7,55");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::error::{CoreError, CoreResult};

/// Minor units per major unit (centavos per real).
pub const MINOR_UNITS: i64 = 100;

/// Number of fractional digits of the minor unit.
pub const MINOR_DIGITS: usize = 2;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (centavos for BRL).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for differences and corrections
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Serializes as the raw centavo count; wire DTOs that carry
///   back-end decimals use [`as_decimal`] instead
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use loteria_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // R$ 10,99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (reais and centavos).
    ///
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -R$ 5,50
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * MINOR_UNITS - minor)
        } else {
            Money(major * MINOR_UNITS + minor)
        }
    }

    /// Parses an exact decimal amount.
    ///
    /// Accepts `.` or `,` as the decimal separator and at most two
    /// fractional digits. No thousands separators, no currency symbol.
    ///
    /// ## Example
    /// ```rust
    /// use loteria_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("200").unwrap().cents(), 20000);
    /// assert_eq!(Money::parse_decimal("0.5").unwrap().cents(), 50);
    /// assert_eq!(Money::parse_decimal("1,25").unwrap().cents(), 125);
    /// assert!(Money::parse_decimal("0.005").is_err());
    /// ```
    pub fn parse_decimal(input: &str) -> CoreResult<Self> {
        let invalid = |reason: &str| CoreError::InvalidAmount {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (whole, frac) = match digits.split_once(['.', ',']) {
            Some((whole, frac)) => (whole, frac),
            None => (digits, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("empty amount"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("expected digits with an optional decimal separator"));
        }
        if frac.len() > MINOR_DIGITS {
            return Err(invalid("more precision than the currency's minor unit"));
        }

        let major: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("amount too large"))?
        };
        // "5" → 50 centavos, "05" → 5 centavos
        let minor: i64 = format!("{:0<width$}", frac, width = MINOR_DIGITS)
            .parse()
            .map_err(|_| invalid("invalid fraction"))?;

        let cents = major
            .checked_mul(MINOR_UNITS)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(|| invalid("amount too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Converts a back-end decimal number to Money, rounding once to the
    /// nearest centavo. Returns `None` for NaN or infinite values.
    ///
    /// Only the JSON boundary should call this; nothing inside the core
    /// works with floats.
    pub fn from_decimal_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let cents = (value * MINOR_UNITS as f64).round();
        if cents > i64::MAX as f64 || cents < i64::MIN as f64 {
            return None;
        }
        Some(Money(cents as i64))
    }

    /// Returns the value as a decimal number for the JSON boundary.
    pub fn to_decimal_f64(&self) -> f64 {
        self.0 as f64 / MINOR_UNITS as f64
    }

    /// Returns the value in centavos (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (reais) portion.
    ///
    /// ## Example
    /// ```rust
    /// use loteria_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).reais(), 10);
    /// assert_eq!(Money::from_cents(-550).reais(), -5);
    /// ```
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / MINOR_UNITS
    }

    /// Returns the minor unit (centavos) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % MINOR_UNITS).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies by an unsigned count, clamping at the representable range.
    ///
    /// Used by the cash count engine, whose quantities have no upper bound.
    #[inline]
    pub fn saturating_mul_count(&self, count: u64) -> Self {
        let count = i64::try_from(count).unwrap_or(i64::MAX);
        Money(self.0.saturating_mul(count))
    }

    /// Adds two amounts, clamping at the representable range.
    #[inline]
    pub const fn saturating_add(&self, other: Money) -> Self {
        Money(self.0.saturating_add(other.0))
    }

    /// Renders the amount as a plain decimal with two digits (`"4.05"`).
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!(
            "{}{}.{:0width$}",
            sign,
            self.reais().abs(),
            self.cents_part(),
            width = MINOR_DIGITS
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display renders Brazilian real formatting: `R$ 1.234,56`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let whole = self.reais().unsigned_abs().to_string();

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        write!(f, "{}R$ {},{:02}", sign, grouped, self.cents_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Wire Format
// =============================================================================

/// Serde adapter for back-end fields that carry money as a JSON decimal
/// number (`"preco": 5.5`).
///
/// ```rust
/// use loteria_core::money::{self, Money};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Game {
///     #[serde(with = "money::as_decimal")]
///     preco: Money,
/// }
///
/// let game: Game = serde_json::from_str(r#"{"preco": 5.5}"#).unwrap();
/// assert_eq!(game.preco.cents(), 550);
/// ```
pub mod as_decimal {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Money;

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(money.to_decimal_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Money::from_decimal_f64(value)
            .ok_or_else(|| D::Error::custom(format!("invalid monetary amount: {}", value)))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.reais(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "R$ 10,99");
        assert_eq!(Money::from_cents(500).to_string(), "R$ 5,00");
        assert_eq!(Money::from_cents(-550).to_string(), "-R$ 5,50");
        assert_eq!(Money::from_cents(0).to_string(), "R$ 0,00");
        assert_eq!(Money::from_cents(123456).to_string(), "R$ 1.234,56");
        assert_eq!(Money::from_cents(100000000).to_string(), "R$ 1.000.000,00");
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(Money::from_cents(405).to_decimal_string(), "4.05");
        assert_eq!(Money::from_cents(20000).to_decimal_string(), "200.00");
        assert_eq!(Money::from_cents(-5).to_decimal_string(), "-0.05");
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(Money::parse_decimal("200").unwrap().cents(), 20000);
        assert_eq!(Money::parse_decimal("0.50").unwrap().cents(), 50);
        assert_eq!(Money::parse_decimal("0.05").unwrap().cents(), 5);
        assert_eq!(Money::parse_decimal("0.5").unwrap().cents(), 50);
        assert_eq!(Money::parse_decimal(",25").unwrap().cents(), 25);
        assert_eq!(Money::parse_decimal("1,00").unwrap().cents(), 100);
        assert_eq!(Money::parse_decimal("-3.10").unwrap().cents(), -310);
        assert_eq!(Money::parse_decimal(" 7 ").unwrap().cents(), 700);
    }

    #[test]
    fn test_parse_decimal_rejects() {
        assert!(Money::parse_decimal("").is_err());
        assert!(Money::parse_decimal(".").is_err());
        assert!(Money::parse_decimal("abc").is_err());
        assert!(Money::parse_decimal("1.2.3").is_err());
        assert!(Money::parse_decimal("0.001").is_err());
        assert!(Money::parse_decimal("R$ 5").is_err());
        assert!(Money::parse_decimal("99999999999999999999").is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        let result: Money = a * 3;
        assert_eq!(result.cents(), 3000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_saturating() {
        let big = Money::from_cents(i64::MAX / 2);
        assert_eq!(big.saturating_mul_count(3).cents(), i64::MAX);
        assert_eq!(big.saturating_add(big).saturating_add(big).cents(), i64::MAX);
        assert_eq!(Money::from_cents(5).saturating_mul_count(u64::MAX).cents(), i64::MAX);
        assert_eq!(Money::from_cents(5).saturating_mul_count(7).cents(), 35);
    }

    #[test]
    fn test_float_boundary() {
        assert_eq!(Money::from_decimal_f64(4.05).unwrap().cents(), 405);
        assert_eq!(Money::from_decimal_f64(0.1 + 0.2).unwrap().cents(), 30);
        assert!(Money::from_decimal_f64(f64::NAN).is_none());
        assert!(Money::from_decimal_f64(f64::INFINITY).is_none());
        assert_eq!(Money::from_cents(1099).to_decimal_f64(), 10.99);
    }

    #[test]
    fn test_as_decimal_serde() {
        #[derive(Serialize, Deserialize)]
        struct Wire {
            #[serde(with = "as_decimal")]
            valor: Money,
        }

        let wire: Wire = serde_json::from_str(r#"{"valor": 12}"#).unwrap();
        assert_eq!(wire.valor.cents(), 1200);

        let wire: Wire = serde_json::from_str(r#"{"valor": 0.3}"#).unwrap();
        assert_eq!(wire.valor.cents(), 30);

        let json = serde_json::to_string(&Wire {
            valor: Money::from_cents(405),
        })
        .unwrap();
        assert_eq!(json, r#"{"valor":4.05}"#);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().cents(), 100);
    }
}
