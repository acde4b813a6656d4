//! Delivery pricing and the totals handed to checkout.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::money::Money;

/// Delivery pricing rules.
///
/// Deserializable so a site can ship it next to the catalogue; missing
/// fields fall back to the defaults.
///
/// # Examples
///
/// ```
/// use pizzeria_cart::{Money, PricingConfig};
///
/// let config = PricingConfig {
///     delivery_fee: Money::from_kronor(39),
///     ..PricingConfig::default()
/// };
/// assert_eq!(config.free_delivery_threshold, Money::from_kronor(300));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Subtotal at or above which delivery is free.
    ///
    /// Default: 300 kr.
    pub free_delivery_threshold: Money,

    /// Fee charged below the threshold.
    ///
    /// Default: 49 kr.
    pub delivery_fee: Money,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            free_delivery_threshold: Money::from_kronor(300),
            delivery_fee: Money::from_kronor(49),
        }
    }
}

impl PricingConfig {
    /// Parse a JSON pricing document.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if the document is malformed.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Delivery fee for a given subtotal. An empty order has no fee.
    pub fn delivery_fee_for(&self, subtotal: Money) -> Money {
        if subtotal.is_zero() || subtotal >= self.free_delivery_threshold {
            Money::ZERO
        } else {
            self.delivery_fee
        }
    }
}

/// Totals for the floating cart widget and the checkout hand-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub total_items: u64,
    /// Sum of line prices before delivery.
    pub subtotal: Money,
    pub delivery_fee: Money,
    /// `subtotal + delivery_fee`.
    pub total: Money,
    /// How much more to add for free delivery; zero once reached.
    pub remaining_for_free_delivery: Money,
}

impl OrderSummary {
    /// Compute the summary from the current cart state.
    pub fn for_cart(cart: &Cart, config: &PricingConfig) -> Self {
        let subtotal = cart.total_price();
        let delivery_fee = config.delivery_fee_for(subtotal);
        Self {
            total_items: cart.total_items(),
            subtotal,
            delivery_fee,
            total: subtotal + delivery_fee,
            remaining_for_free_delivery: config.free_delivery_threshold.saturating_sub(subtotal),
        }
    }

    /// Whether the order qualifies for free delivery.
    pub fn has_free_delivery(&self) -> bool {
        self.total_items > 0 && self.remaining_for_free_delivery.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Aggregate;
    use crate::cart::CartCommand;
    use crate::catalogue::test_fixtures::pizza;
    use crate::size::Size;

    fn cart_with(items: &[(u32, u64, Size)]) -> Cart {
        items.iter().fold(Cart::default(), |cart, &(id, kronor, size)| {
            let events = cart
                .handle(CartCommand::AddItem {
                    item: pizza(id, kronor),
                    size,
                })
                .unwrap();
            events.iter().fold(cart, |state, event| state.apply(event))
        })
    }

    #[test]
    fn empty_cart_has_no_fee() {
        let summary = OrderSummary::for_cart(&Cart::default(), &PricingConfig::default());
        assert_eq!(summary.subtotal, Money::ZERO);
        assert_eq!(summary.delivery_fee, Money::ZERO);
        assert_eq!(summary.total, Money::ZERO);
        assert!(!summary.has_free_delivery());
    }

    #[test]
    fn below_threshold_pays_fee() {
        let cart = cart_with(&[(1, 79, Size::Medium), (1, 79, Size::Medium)]);
        let summary = OrderSummary::for_cart(&cart, &PricingConfig::default());
        assert_eq!(summary.subtotal, Money::from_ore(18_170));
        assert_eq!(summary.delivery_fee, Money::from_kronor(49));
        assert_eq!(summary.total, Money::from_ore(18_170 + 4_900));
        assert_eq!(summary.remaining_for_free_delivery, Money::from_ore(11_830));
    }

    #[test]
    fn at_threshold_delivery_is_free() {
        let cart = cart_with(&[(1, 150, Size::Small), (2, 150, Size::Small)]);
        let summary = OrderSummary::for_cart(&cart, &PricingConfig::default());
        assert_eq!(summary.delivery_fee, Money::ZERO);
        assert_eq!(summary.remaining_for_free_delivery, Money::ZERO);
        assert!(summary.has_free_delivery());
    }

    #[test]
    fn config_json_falls_back_to_defaults() {
        let config = PricingConfig::from_json(r#"{"delivery_fee": 2900}"#).unwrap();
        assert_eq!(config.delivery_fee, Money::from_kronor(29));
        assert_eq!(config.free_delivery_threshold, Money::from_kronor(300));
    }

    #[test]
    fn config_json_rejects_garbage() {
        assert!(PricingConfig::from_json("not json").is_err());
    }
}
