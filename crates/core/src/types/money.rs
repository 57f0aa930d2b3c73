//! Baht-denominated amounts.
//!
//! All storefront prices are Thai Baht. `Baht` wraps a `rust_decimal::Decimal`
//! so that order totals never go through floating point, and renders with the
//! `฿` prefix and thousands separators used throughout the LINE messages
//! (e.g. `฿1,150` or `฿1,150.50`).

use std::iter::Sum;
use std::ops::{Add, Mul, Sub};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Flat shipping fee applied to every order, in Baht.
///
/// Not configurable per order: checkout always charges subtotal + 50.
pub const SHIPPING_FEE: Baht = Baht(Decimal::from_parts(50, 0, 0, false, 0));

/// An amount of Thai Baht.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type), sqlx(transparent))]
pub struct Baht(Decimal);

impl Baht {
    /// Zero Baht.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wrap a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Construct from a whole-Baht integer amount.
    #[must_use]
    pub fn from_whole(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is negative. Negative amounts are rejected at the
    /// API boundary; the data model never stores them.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Multiply by an item quantity.
    #[must_use]
    pub fn times(&self, quantity: i32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Format for display: `฿` prefix, thousands separators, and two decimal
    /// places only when the amount has a fractional part.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self.0.round_dp(2);
        let negative = rounded.is_sign_negative();
        let text = rounded.abs().to_string();

        let (int_part, frac_part) = match text.split_once('.') {
            Some((i, f)) => (i, f.trim_end_matches('0')),
            None => (text.as_str(), ""),
        };

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (pos, ch) in int_part.chars().enumerate() {
            let remaining = int_part.len() - pos;
            if pos > 0 && remaining % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        let sign = if negative { "-" } else { "" };
        if frac_part.is_empty() {
            format!("{sign}฿{grouped}")
        } else {
            format!("{sign}฿{grouped}.{frac_part:0<2}")
        }
    }
}

impl std::fmt::Display for Baht {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<Decimal> for Baht {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Baht> for Decimal {
    fn from(baht: Baht) -> Self {
        baht.0
    }
}

impl Add for Baht {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Baht {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<i32> for Baht {
    type Output = Self;

    fn mul(self, rhs: i32) -> Self {
        self.times(rhs)
    }
}

impl Sum for Baht {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}
