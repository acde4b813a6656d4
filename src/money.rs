//! Fixed-currency money amounts stored in öre.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Number of öre in one krona.
pub const ORE_PER_KRONA: u64 = 100;

/// An amount of money in Swedish kronor, stored as whole öre.
///
/// Integer storage keeps cart arithmetic exact; rounding happens only at
/// the display boundary ([`rounded_kronor`](Money::rounded_kronor)).
///
/// # Examples
///
/// ```
/// use pizzeria_cart::Money;
///
/// let price = Money::from_ore(18_170);
/// assert_eq!(price.rounded_kronor(), 182);
/// assert_eq!(price.to_string(), "182 kr");
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// The zero amount.
    pub const ZERO: Money = Money(0);

    /// Build an amount from whole kronor, clamping at `u64::MAX` öre.
    pub const fn from_kronor(kronor: u64) -> Self {
        Self(kronor.saturating_mul(ORE_PER_KRONA))
    }

    /// Build an amount from öre.
    pub const fn from_ore(ore: u64) -> Self {
        Self(ore)
    }

    /// The amount in öre.
    pub const fn as_ore(self) -> u64 {
        self.0
    }

    /// Whether this amount is zero.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// The exact amount in kronor as a float, for surfaces that show decimals.
    pub fn as_kronor_f64(self) -> f64 {
        self.0 as f64 / ORE_PER_KRONA as f64
    }

    /// Round half-up to whole kronor (the display policy).
    pub const fn rounded_kronor(self) -> u64 {
        (self.0 + ORE_PER_KRONA / 2) / ORE_PER_KRONA
    }

    /// Subtract, clamping at zero.
    pub const fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }

    /// Add, clamping at `u64::MAX` öre.
    pub const fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Convert an amount in hundredths of an öre to öre, rounding half-up.
    ///
    /// Percentage multipliers produce hundredths; this is the single place
    /// where they are rounded back to whole öre. Amounts past `u64::MAX`
    /// öre clamp instead of wrapping.
    pub(crate) const fn from_centi_ore(centi_ore: u128) -> Money {
        let ore = centi_ore.saturating_add(50) / 100;
        if ore > u64::MAX as u128 {
            Money(u64::MAX)
        } else {
            Money(ore as u64)
        }
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        self.saturating_add(rhs)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} kr", self.rounded_kronor())
    }
}
