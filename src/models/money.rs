//! Money type for representing currency amounts
//!
//! Amounts are exact fixed-point decimals with two places, stored as an i64
//! count of cents. Nothing in the planner touches binary floats.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A monetary amount in cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Largest amount a planner stores: 999,999,999,999.99
    pub const MAX: Money = Money(99_999_999_999_999);

    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use budget_planner::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// assert_eq!(amount.to_string(), "10.50");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole units and cents
    pub const fn from_units_cents(units: i64, cents: i64) -> Self {
        Self(units * 100 + cents)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole units, truncated toward zero
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Whether the magnitude is above `Money::MAX`
    pub const fn exceeds_max(&self) -> bool {
        self.0.unsigned_abs() > Self::MAX.0 as u64
    }

    /// Divide into `parts` equal shares, rounding half away from zero to the cent
    ///
    /// Used for a bill's per-month average: `1200.00` over 12 months is `100.00`.
    /// Returns `None` when `parts` is zero.
    pub fn divide_rounded(&self, parts: u32) -> Option<Self> {
        if parts == 0 {
            return None;
        }
        let parts = i128::from(parts);
        let magnitude = (i128::from(self.0).abs() * 2 + parts) / (parts * 2);
        let share = if self.0 < 0 { -magnitude } else { magnitude };
        // a share never exceeds its dividend, so it always fits back into an i64
        Some(Self(i64::try_from(share).unwrap_or(self.0)))
    }

    /// Parse a money amount from a string
    ///
    /// Accepts "10.50", "-10.50", "€10.50", "$10.50", "10" and "10.5".
    /// More than two fractional digits is rejected rather than truncated, and
    /// so is anything above `Money::MAX`.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let original = s;
        let s = s.trim();

        let (negative, s) = match s.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, s),
        };

        let s = s
            .strip_prefix('€')
            .or_else(|| s.strip_prefix('$'))
            .unwrap_or(s)
            .replace(',', "");

        let invalid = || MoneyParseError::InvalidFormat(original.to_string());

        let (units_str, frac_str) = match s.split_once('.') {
            Some((units, frac)) => (units, frac),
            None => (s.as_str(), ""),
        };

        if units_str.is_empty() && frac_str.is_empty() {
            return Err(invalid());
        }
        if !units_str.chars().all(|c| c.is_ascii_digit())
            || !frac_str.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }
        if frac_str.len() > 2 {
            return Err(MoneyParseError::TooPrecise(original.to_string()));
        }

        let units: i64 = if units_str.is_empty() {
            0
        } else {
            // all digits at this point, so a failure means overflow
            units_str
                .parse()
                .map_err(|_| MoneyParseError::TooLarge(original.to_string()))?
        };
        let cents: i64 = match frac_str.len() {
            0 => 0,
            1 => frac_str.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => frac_str.parse().map_err(|_| invalid())?,
        };

        let total = units
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .ok_or_else(|| MoneyParseError::TooLarge(original.to_string()))?;
        if total > Self::MAX.0 {
            return Err(MoneyParseError::TooLarge(original.to_string()));
        }

        Ok(Self(if negative { -total } else { total }))
    }

    /// Format with a currency symbol, e.g. `€1200.00`
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!("-{}{}.{:02}", symbol, self.units().abs(), self.cents_part())
        } else {
            format!("{}{}.{:02}", symbol, self.units(), self.cents_part())
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.format_with_symbol("");
        f.pad(&text)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    TooPrecise(String),
    TooLarge(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            Self::TooPrecise(s) => write!(f, "At most two decimal places allowed: {}", s),
            Self::TooLarge(s) => write!(f, "Amount exceeds {}: {}", Money::MAX, s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(1050);
        assert_eq!(m.cents(), 1050);
        assert_eq!(m.units(), 10);
        assert_eq!(m.cents_part(), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1050)), "10.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "0.00");
        assert_eq!(format!("{}", Money::from_cents(-1050)), "-10.50");
        assert_eq!(format!("{}", Money::from_cents(5)), "0.05");
        assert_eq!(format!("{:>8}", Money::from_cents(5)), "    0.05");
    }

    #[test]
    fn test_format_with_symbol() {
        assert_eq!(Money::from_cents(120000).format_with_symbol("€"), "€1200.00");
        assert_eq!(Money::from_cents(-250).format_with_symbol("€"), "-€2.50");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("€10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("$10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("-10.50").unwrap().cents(), -1050);
        assert_eq!(Money::parse("10").unwrap().cents(), 1000);
        assert_eq!(Money::parse("10.5").unwrap().cents(), 1050);
        assert_eq!(Money::parse("0.05").unwrap().cents(), 5);
        assert_eq!(Money::parse("1,200.00").unwrap().cents(), 120000);
    }

    #[test]
    fn test_parse_rejects_garbage_and_extra_precision() {
        assert!(matches!(
            Money::parse("abc"),
            Err(MoneyParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            Money::parse("1.2.3"),
            Err(MoneyParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            Money::parse("10.555"),
            Err(MoneyParseError::TooPrecise(_))
        ));
        assert!(Money::parse("").is_err());
    }

    #[test]
    fn test_divide_rounded() {
        let annual = Money::from_cents(120000);
        assert_eq!(annual.divide_rounded(12), Some(Money::from_cents(10000)));
        assert_eq!(annual.divide_rounded(6), Some(Money::from_cents(20000)));
        // 100.00 / 3 = 33.333.. -> 33.33
        assert_eq!(
            Money::from_cents(10000).divide_rounded(3),
            Some(Money::from_cents(3333))
        );
        // 0.05 / 2 = 0.025 -> 0.03
        assert_eq!(
            Money::from_cents(5).divide_rounded(2),
            Some(Money::from_cents(3))
        );
        assert_eq!(annual.divide_rounded(0), None);
    }

    #[test]
    fn test_divide_rounded_near_i64_limits() {
        let huge = Money::from_cents(i64::MAX);
        assert_eq!(huge.divide_rounded(1), Some(huge));
        assert_eq!(
            huge.divide_rounded(12),
            Some(Money::from_cents(768_614_336_404_564_651))
        );
        assert_eq!(
            Money::from_cents(i64::MIN + 1).divide_rounded(2),
            Some(Money::from_cents(-4_611_686_018_427_387_904))
        );
    }

    #[test]
    fn test_parse_rejects_amounts_above_max() {
        assert_eq!(Money::parse("999999999999.99"), Ok(Money::MAX));
        assert!(matches!(
            Money::parse("1000000000000.00"),
            Err(MoneyParseError::TooLarge(_))
        ));
        assert!(matches!(
            Money::parse("50000000000000000.00"),
            Err(MoneyParseError::TooLarge(_))
        ));
        assert!(matches!(
            Money::parse("99999999999999999999"),
            Err(MoneyParseError::TooLarge(_))
        ));
    }

    #[test]
    fn test_arithmetic_saturates() {
        let big = Money::from_cents(6 * 10_i64.pow(18));
        let total: Money = [big, big].into_iter().sum();
        assert_eq!(total, Money::from_cents(i64::MAX));
        assert_eq!(Money::from_cents(i64::MIN) - big, Money::from_cents(i64::MIN));
        assert!(total.exceeds_max());
        assert!(!Money::MAX.exceeds_max());
    }

    #[test]
    fn test_sum() {
        let amounts = vec![
            Money::from_cents(100),
            Money::from_cents(200),
            Money::from_cents(300),
        ];
        let total: Money = amounts.iter().sum();
        assert_eq!(total.cents(), 600);
        let empty: Vec<Money> = Vec::new();
        assert_eq!(empty.into_iter().sum::<Money>(), Money::zero());
    }
}
