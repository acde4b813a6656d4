//! Pizza sizes and their price multipliers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::money::Money;

/// The size chosen for a cart line.
///
/// Each size carries a fixed price multiplier applied to the catalogue
/// base price: Small ×1.00, Medium ×1.15, Large ×1.30. The multiplier is
/// applied at read time, never stored on the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Size {
    Small,
    Medium,
    Large,
}

impl Size {
    /// All sizes, smallest first.
    pub const ALL: [Size; 3] = [Size::Small, Size::Medium, Size::Large];

    /// The multiplier in whole percent (100, 115, 130).
    pub const fn multiplier_percent(self) -> u32 {
        match self {
            Self::Small => 100,
            Self::Medium => 115,
            Self::Large => 130,
        }
    }

    /// The multiplier as a factor (1.00, 1.15, 1.30).
    pub fn multiplier(self) -> f64 {
        f64::from(self.multiplier_percent()) / 100.0
    }

    /// Price of `quantity` units of a `base` priced item in this size.
    ///
    /// Computed exactly in hundredths of an öre and rounded once.
    pub fn price(self, base: Money, quantity: u32) -> Money {
        let centi_ore = u128::from(base.as_ore())
            * u128::from(self.multiplier_percent())
            * u128::from(quantity);
        Money::from_centi_ore(centi_ore)
    }

    /// Display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a size label is not one of `small`, `medium`, `large`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown size: {0:?}")]
pub struct ParseSizeError(pub String);

impl FromStr for Size {
    type Err = ParseSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" | "s" => Ok(Self::Small),
            "medium" | "m" => Ok(Self::Medium),
            "large" | "l" => Ok(Self::Large),
            _ => Err(ParseSizeError(s.to_owned())),
        }
    }
}
