//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    2500.99 * 0.8 = 2000.7920000000001  ❌ WRONG!                        │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents + Decimal Ratios                           │
//! │    Money is stored as 250099 cents                                      │
//! │    Ratios (percentages) are rust_decimal::Decimal                       │
//! │    The product is exact, then rounded ONCE (half-to-even)               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use catalog_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(1099); // 10.99
//!
//! // Arithmetic operations
//! let total = price + Money::from_cents(500); // 15.99
//! assert_eq!(total.to_string(), "15.99");
//!
//! // NEVER do this:
//! // let bad = Money::from_float(10.99); // NO SUCH METHOD EXISTS!
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::error::ValidationError;

/// Number of fractional digits carried by every Money value.
pub const MONEY_SCALE: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Subtraction may go below zero before clamping
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serde via Decimal**: JSON carries `"2500.99"`, never a float
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.price ──┬──► evaluate(discount) ──► candidate price            │
/// │                  │                                │                     │
/// │                  │                                ▼                     │
/// │                  └──────────────────────► select_best ──► discounted    │
/// │                                                              price      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use catalog_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts, only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the value, or zero if it is negative.
    ///
    /// ## Example
    /// ```rust
    /// use catalog_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-550).clamp_zero(), Money::zero());
    /// assert_eq!(Money::from_cents(550).clamp_zero().cents(), 550);
    /// ```
    #[inline]
    pub const fn clamp_zero(self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            self
        }
    }

    /// Returns the exact decimal value (scale 2).
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, MONEY_SCALE)
    }

    /// Converts an arbitrary-precision decimal to Money using Bankers
    /// Rounding (round half to even).
    ///
    /// ## Bankers Rounding Explained
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  Standard rounding always rounds 0.5 UP, causing systematic bias:  │
    /// │    0.005 → 0.01, 0.015 → 0.02, 0.025 → 0.03                         │
    /// │                                                                     │
    /// │  Bankers Rounding rounds 0.5 to the nearest EVEN digit:            │
    /// │    0.005 → 0.00, 0.015 → 0.02, 0.025 → 0.02                         │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// Values outside the `i64` cent range saturate.
    ///
    /// ## Example
    /// ```rust
    /// use catalog_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let exact = Decimal::new(2000792, 3); // 2000.792
    /// assert_eq!(Money::from_decimal_rounded(exact).cents(), 200079);
    /// ```
    pub fn from_decimal_rounded(value: Decimal) -> Self {
        let rounded = value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven);
        match rounded.checked_mul(Decimal::ONE_HUNDRED).and_then(|c| c.to_i64()) {
            Some(c) => Money(c),
            None if rounded.is_sign_negative() => Money(i64::MIN),
            None => Money(i64::MAX),
        }
    }

    /// Multiplies money by a unitless ratio, rounding the result to cents.
    ///
    /// ## Example
    /// ```rust
    /// use catalog_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let price = Money::from_cents(250099);
    /// let fifth = price.multiply_ratio(Decimal::new(2, 1)); // × 0.2
    /// assert_eq!(fifth.cents(), 50020); // 500.198 → 500.20
    /// ```
    pub fn multiply_ratio(&self, ratio: Decimal) -> Money {
        Money::from_decimal_rounded(self.to_decimal() * ratio)
    }
}

// =============================================================================
// Conversions
// =============================================================================

/// Strict conversion used for input: more than two fractional digits is an
/// error rather than a silent rounding.
impl TryFrom<Decimal> for Money {
    type Error = ValidationError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        if value.round_dp(MONEY_SCALE) != value {
            return Err(ValidationError::TooPrecise {
                field: "amount".to_string(),
                places: MONEY_SCALE,
            });
        }

        (value * Decimal::ONE_HUNDRED)
            .to_i64()
            .map(Money)
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: "value is out of range".to_string(),
            })
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.to_decimal()
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain two-decimal rendering, e.g. `2500.99` or `-5.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

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

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(250099).to_string(), "2500.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(0).to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((b - a).cents(), -500);

        let mut c = a;
        c += b;
        c -= Money::from_cents(1);
        assert_eq!(c.cents(), 1499);
    }

    #[test]
    fn test_comparison() {
        assert!(Money::from_cents(100) < Money::from_cents(101));
        assert_eq!(
            Money::from_cents(3).max(Money::from_cents(7)),
            Money::from_cents(7)
        );
    }

    #[test]
    fn test_clamp_zero() {
        assert_eq!(Money::from_cents(-1).clamp_zero(), Money::zero());
        assert_eq!(Money::zero().clamp_zero(), Money::zero());
        assert_eq!(Money::from_cents(42).clamp_zero().cents(), 42);
    }

    #[test]
    fn test_bankers_rounding() {
        assert_eq!(Money::from_decimal_rounded(dec!(0.005)).cents(), 0);
        assert_eq!(Money::from_decimal_rounded(dec!(0.015)).cents(), 2);
        assert_eq!(Money::from_decimal_rounded(dec!(0.025)).cents(), 2);
        assert_eq!(Money::from_decimal_rounded(dec!(2000.792)).cents(), 200079);
        assert_eq!(Money::from_decimal_rounded(dec!(-1.005)).cents(), -100);
    }

    #[test]
    fn test_multiply_ratio() {
        let price = Money::from_cents(250099);
        assert_eq!(price.multiply_ratio(dec!(0.2)).cents(), 50020);
        assert_eq!(price.multiply_ratio(Decimal::ONE), price);
        assert_eq!(price.multiply_ratio(Decimal::ZERO), Money::zero());
    }

    #[test]
    fn test_try_from_decimal() {
        assert_eq!(Money::try_from(dec!(2500.99)).unwrap().cents(), 250099);
        assert_eq!(Money::try_from(dec!(10)).unwrap().cents(), 1000);
        assert_eq!(Money::try_from(dec!(10.500)).unwrap().cents(), 1050);
        assert!(Money::try_from(dec!(10.999)).is_err());
    }

    #[test]
    fn test_json_uses_decimal_strings() {
        let price = Money::from_cents(250099);
        assert_eq!(serde_json::to_string(&price).unwrap(), "\"2500.99\"");

        let from_str: Money = serde_json::from_str("\"19.90\"").unwrap();
        assert_eq!(from_str.cents(), 1990);

        let from_number: Money = serde_json::from_str("10").unwrap();
        assert_eq!(from_number.cents(), 1000);

        assert!(serde_json::from_str::<Money>("\"1.234\"").is_err());
    }
}
