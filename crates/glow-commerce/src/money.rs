//! Money type for representing monetary values.
//!
//! Uses cents-based integer representation to avoid floating-point
//! precision issues that plague monetary calculations. Percentages are
//! expressed as a [`Rate`] in basis points so tax and discount math stays
//! integral.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CommerceError;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    JPY,
    CAD,
    INR,
}

impl Currency {
    /// Get the currency code (e.g., "USD").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CAD => "CAD",
            Currency::INR => "INR",
        }
    }

    /// Get the currency symbol (e.g., "$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::JPY => "\u{00a5}",
            Currency::CAD => "CA$",
            Currency::INR => "\u{20b9}",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "JPY" => Some(Currency::JPY),
            "CAD" => Some(Currency::CAD),
            "INR" => Some(Currency::INR),
            _ => None,
        }
    }

    fn minor_per_major(&self) -> i64 {
        10_i64.pow(self.decimal_places())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A percentage expressed in basis points (1 bp = 0.01%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Rate(u32);

impl Rate {
    /// 100%.
    pub const FULL: Rate = Rate(10_000);

    /// Create a rate from basis points.
    pub const fn from_bps(bps: u32) -> Self {
        Self(bps)
    }

    /// Create a rate from a whole percentage.
    pub const fn percent(percent: u32) -> Self {
        Self(percent * 100)
    }

    /// Basis points.
    pub fn bps(&self) -> u32 {
        self.0
    }

    /// Check if this rate is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = self.0 % 100;
        if frac == 0 {
            write!(f, "{}%", whole)
        } else if frac % 10 == 0 {
            write!(f, "{}.{}%", whole, frac / 10)
        } else {
            write!(f, "{}.{:02}%", whole, frac)
        }
    }
}

/// A monetary value with currency.
///
/// Amounts are stored in the smallest unit of the currency (e.g., cents for USD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Amount in smallest currency unit (e.g., cents).
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from cents.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Create a Money value from a decimal amount.
    ///
    /// ```
    /// use glow_commerce::money::{Money, Currency};
    /// let price = Money::from_decimal(49.99, Currency::USD);
    /// assert_eq!(price.amount_cents, 4999);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        let amount_cents = (amount * currency.minor_per_major() as f64).round() as i64;
        Self::new(amount_cents, currency)
    }

    /// Parse a human-entered price such as `"$49.99"`, `"1,299.00"` or `"₹ 250"`.
    ///
    /// Currency symbols, thousands separators and whitespace are stripped
    /// before parsing. Returns `None` when nothing numeric remains.
    pub fn parse_lenient(input: &str, currency: Currency) -> Option<Self> {
        let cleaned: String = input
            .chars()
            .filter(|c| !matches!(c, '$' | ',' | '\u{20b9}' | '\u{20ac}' | '\u{00a3}' | '\u{00a5}'))
            .filter(|c| !c.is_whitespace())
            .collect();
        if cleaned.is_empty() {
            return None;
        }
        let amount: f64 = cleaned.parse().ok()?;
        if !amount.is_finite() {
            return None;
        }
        Some(Self::from_decimal(amount, currency))
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Check if this is positive.
    pub fn is_positive(&self) -> bool {
        self.amount_cents > 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_cents < 0
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        self.amount_cents as f64 / self.currency.minor_per_major() as f64
    }

    /// Format as a display string (e.g., "$1,249.99").
    pub fn display(&self) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!("{}{}{}", sign, self.currency.symbol(), self.display_amount())
    }

    /// Format the absolute amount without symbol (e.g., "1,249.99").
    pub fn display_amount(&self) -> String {
        let per_major = self.currency.minor_per_major() as u64;
        let abs = self.amount_cents.unsigned_abs();
        let major = group_thousands(abs / per_major);
        match self.currency.decimal_places() {
            0 => major,
            places => format!(
                "{}.{:0width$}",
                major,
                abs % per_major,
                width = places as usize
            ),
        }
    }

    /// Add another Money value.
    pub fn try_add(&self, other: &Money) -> Result<Money, CommerceError> {
        self.ensure_same_currency(other)?;
        self.amount_cents
            .checked_add(other.amount_cents)
            .map(|cents| Money::new(cents, self.currency))
            .ok_or(CommerceError::Overflow)
    }

    /// Subtract another Money value.
    pub fn try_subtract(&self, other: &Money) -> Result<Money, CommerceError> {
        self.ensure_same_currency(other)?;
        self.amount_cents
            .checked_sub(other.amount_cents)
            .map(|cents| Money::new(cents, self.currency))
            .ok_or(CommerceError::Overflow)
    }

    /// Multiply by an integer quantity.
    pub fn try_multiply(&self, factor: i64) -> Result<Money, CommerceError> {
        self.amount_cents
            .checked_mul(factor)
            .map(|cents| Money::new(cents, self.currency))
            .ok_or(CommerceError::Overflow)
    }

    /// Apply a rate, rounding half away from zero to the nearest minor unit.
    ///
    /// ```
    /// use glow_commerce::money::{Currency, Money, Rate};
    /// let tax = Money::new(8000, Currency::USD).apply_rate(Rate::percent(8)).unwrap();
    /// assert_eq!(tax.amount_cents, 640);
    /// ```
    pub fn apply_rate(&self, rate: Rate) -> Result<Money, CommerceError> {
        let product = self.amount_cents as i128 * rate.bps() as i128;
        let rounded = (product.abs() + 5_000) / 10_000;
        let signed = if product < 0 { -rounded } else { rounded };
        i64::try_from(signed)
            .map(|cents| Money::new(cents, self.currency))
            .map_err(|_| CommerceError::Overflow)
    }

    /// Split evenly over `count` parts, rounding half away from zero.
    /// Zero parts give zero.
    pub fn average_over(&self, count: usize) -> Money {
        let Ok(n) = i64::try_from(count) else {
            return Money::zero(self.currency);
        };
        if n == 0 {
            return Money::zero(self.currency);
        }
        let rounded = (self.amount_cents.unsigned_abs() + n.unsigned_abs() / 2) / n.unsigned_abs();
        let cents = i64::try_from(rounded).unwrap_or(i64::MAX);
        Money::new(
            if self.amount_cents < 0 { -cents } else { cents },
            self.currency,
        )
    }

    /// Sum an iterator of Money values.
    pub fn try_sum<'a>(
        mut iter: impl Iterator<Item = &'a Money>,
        currency: Currency,
    ) -> Result<Money, CommerceError> {
        iter.try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), CommerceError> {
        if self.currency != other.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: other.currency.code().to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_decimal() {
        let m = Money::from_decimal(49.99, Currency::USD);
        assert_eq!(m.amount_cents, 4999);

        let m = Money::from_decimal(100.0, Currency::JPY);
        assert_eq!(m.amount_cents, 100); // JPY has no decimals
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(4999, Currency::USD).display(), "$49.99");
        assert_eq!(Money::new(123456789, Currency::USD).display(), "$1,234,567.89");
        assert_eq!(Money::new(-505, Currency::USD).display(), "-$5.05");
        assert_eq!(Money::new(0, Currency::USD).display(), "$0.00");
        assert_eq!(Money::new(100, Currency::JPY).display(), "\u{00a5}100");
    }

    #[test]
    fn test_parse_lenient() {
        let usd = Currency::USD;
        assert_eq!(Money::parse_lenient("$49.99", usd), Some(Money::new(4999, usd)));
        assert_eq!(Money::parse_lenient("1,299.00", usd), Some(Money::new(129900, usd)));
        assert_eq!(Money::parse_lenient("\u{20b9} 250", usd), Some(Money::new(25000, usd)));
        assert_eq!(Money::parse_lenient("20", usd), Some(Money::new(2000, usd)));
        assert_eq!(Money::parse_lenient("free", usd), None);
        assert_eq!(Money::parse_lenient("  ", usd), None);
    }

    #[test]
    fn test_money_arithmetic() {
        let a = Money::new(1000, Currency::USD);
        let b = Money::new(300, Currency::USD);
        assert_eq!(a.try_add(&b).unwrap().amount_cents, 1300);
        assert_eq!(a.try_subtract(&b).unwrap().amount_cents, 700);
        assert_eq!(a.try_multiply(3).unwrap().amount_cents, 3000);
    }

    #[test]
    fn test_money_overflow() {
        let big = Money::new(i64::MAX, Currency::USD);
        assert!(matches!(big.try_multiply(2), Err(CommerceError::Overflow)));
        assert!(matches!(
            big.try_add(&Money::new(1, Currency::USD)),
            Err(CommerceError::Overflow)
        ));
    }

    #[test]
    fn test_money_currency_mismatch() {
        let usd = Money::new(1000, Currency::USD);
        let eur = Money::new(1000, Currency::EUR);
        assert!(matches!(
            usd.try_add(&eur),
            Err(CommerceError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_apply_rate_rounding() {
        let usd = Currency::USD;
        assert_eq!(Money::new(10000, usd).apply_rate(Rate::percent(10)).unwrap().amount_cents, 1000);
        // 8% of $49.99 = 399.92 cents -> 400
        assert_eq!(Money::new(4999, usd).apply_rate(Rate::percent(8)).unwrap().amount_cents, 400);
        // 8% of $0.06 = 0.48 cents -> 0
        assert_eq!(Money::new(6, usd).apply_rate(Rate::percent(8)).unwrap().amount_cents, 0);
        // Exactly half rounds away from zero: 5% of 10 cents = 0.5
        assert_eq!(Money::new(10, usd).apply_rate(Rate::percent(5)).unwrap().amount_cents, 1);
    }

    #[test]
    fn test_rate_display() {
        assert_eq!(Rate::percent(8).to_string(), "8%");
        assert_eq!(Rate::from_bps(825).to_string(), "8.25%");
        assert_eq!(Rate::from_bps(750).to_string(), "7.5%");
    }

    #[test]
    fn test_try_sum() {
        let items = [Money::new(100, Currency::USD), Money::new(250, Currency::USD)];
        let total = Money::try_sum(items.iter(), Currency::USD).unwrap();
        assert_eq!(total.amount_cents, 350);
    }

    #[test]
    fn test_average_over() {
        let spent = Money::new(125075, Currency::USD);
        assert_eq!(spent.average_over(12).amount_cents, 10423);
        assert_eq!(Money::new(-5, Currency::USD).average_over(2).amount_cents, -3);
        assert!(spent.average_over(0).is_zero());
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("USD"), Some(Currency::USD));
        assert_eq!(Currency::from_code("eur"), Some(Currency::EUR));
        assert_eq!(Currency::from_code("INVALID"), None);
    }
}
