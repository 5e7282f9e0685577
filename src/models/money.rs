//! Money type for representing rounded currency amounts
//!
//! Balances are accumulated as `f64` by the engine; everything that leaves the
//! engine for display (transfers, category totals) is rounded into `Money`,
//! which stores whole cents as an `i64`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Represents a monetary amount stored as cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use roomsplit::models::Money;
    /// let amount = Money::from_cents(1050); // $10.50
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Round a real amount to the nearest cent (half away from zero)
    ///
    /// # Examples
    /// ```
    /// use roomsplit::models::Money;
    /// assert_eq!(Money::from_amount(33.335).cents(), 3334);
    /// assert_eq!(Money::from_amount(-0.004).cents(), 0);
    /// ```
    pub fn from_amount(amount: f64) -> Self {
        // Nudge by a fraction of a cent so that 33.335 (stored as 33.33499..)
        // still rounds up like it does on paper.
        let scaled = amount * 100.0;
        let nudged = scaled + scaled.signum() * 1e-7;
        Self(nudged.round() as i64)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the amount as a real number of currency units
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Get the whole units portion (truncated toward zero)
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if the amount is positive
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Get the absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Format with a currency symbol, sign in front: `-$3.50`
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{}{}{}.{:02}", sign, symbol, abs / 100, abs % 100)
    }

    /// Split into `parts` amounts that differ by at most one cent and sum
    /// back to `self`; the first parts get the extra cents
    ///
    /// ```
    /// use roomsplit::models::Money;
    /// let shares = Money::from_cents(1000).split_even(3);
    /// assert_eq!(shares, vec![Money::from_cents(334), Money::from_cents(333), Money::from_cents(333)]);
    /// ```
    pub fn split_even(&self, parts: usize) -> Vec<Money> {
        if parts == 0 {
            return Vec::new();
        }
        let parts_i = parts as i64;
        let base = self.0.div_euclid(parts_i);
        let extra = self.0.rem_euclid(parts_i) as usize;
        (0..parts)
            .map(|i| Money(base + i64::from(i < extra)))
            .collect()
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.format_with_symbol("$"))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}
