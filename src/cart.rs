//! Cart aggregate: line items keyed by (item id, size), with derived totals.
//!
//! Lines store the catalogue base price. The size multiplier is applied
//! whenever a price is read, so every view computes the same number from the
//! same stored state.

use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregate;
use crate::catalogue::{CatalogueItem, ItemId};
use crate::money::Money;
use crate::size::Size;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Identity of a cart line. Two additions with the same key merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineKey {
    pub item_id: ItemId,
    pub size: Size,
}

impl LineKey {
    pub fn new(item_id: ItemId, size: Size) -> Self {
        Self { item_id, size }
    }
}

/// One (catalogue item, size) pairing and its quantity.
///
/// Display fields are copied from the catalogue at insertion so the cart
/// renders without re-joining the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub item_id: ItemId,
    pub name: String,
    pub description: String,
    /// Catalogue base price, without the size multiplier.
    pub base_price: Money,
    pub image: String,
    pub size: Size,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartLine {
    /// A new quantity-1 line for `item` in `size`.
    pub fn from_item(item: &CatalogueItem, size: Size) -> Self {
        Self {
            item_id: item.id,
            name: item.name.clone(),
            description: item.description.clone(),
            base_price: item.price,
            image: item.image.clone(),
            size,
            quantity: 1,
        }
    }

    pub fn key(&self) -> LineKey {
        LineKey::new(self.item_id, self.size)
    }

    /// Size-adjusted price of a single unit.
    pub fn unit_price(&self) -> Money {
        self.size.price(self.base_price, 1)
    }

    /// Size-adjusted price of the whole line.
    pub fn total_price(&self) -> Money {
        self.size.price(self.base_price, self.quantity)
    }
}

/// The shopping cart. Lines are kept in order of first addition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, key: LineKey) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.key() == key)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities across all lines (not the number of lines).
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Σ base price × size multiplier × quantity, recomputed on every call.
    ///
    /// Each line is rounded to the öre first and the rounded lines are
    /// summed, so the subtotal always equals the line totals a cart page shows.
    pub fn total_price(&self) -> Money {
        self.lines.iter().map(CartLine::total_price).sum()
    }

    fn position(&self, key: LineKey) -> Option<usize> {
        self.lines.iter().position(|line| line.key() == key)
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Commands accepted by the [`Cart`] aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CartCommand {
    /// Add one unit of `item` in `size`, merging with an existing line.
    AddItem { item: CatalogueItem, size: Size },
    /// Remove the line for this key, if present.
    RemoveItem { item_id: ItemId, size: Size },
    /// Set the line's quantity exactly; `quantity <= 0` removes the line.
    UpdateQuantity {
        item_id: ItemId,
        size: Size,
        quantity: i64,
    },
    /// Empty the cart.
    Clear,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Domain events produced by the [`Cart`] aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CartEvent {
    /// A new line was inserted with quantity 1.
    LineAdded { line: CartLine },
    /// An existing line's quantity was set to `quantity` (always >= 1).
    QuantityChanged { key: LineKey, quantity: u32 },
    /// A line was removed.
    LineRemoved { key: LineKey },
    /// Every line was removed.
    Cleared,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Caller-contract violations rejected by the [`Cart`] aggregate.
///
/// Removing or updating an absent line is not an error; it yields no events.
#[derive(Debug, thiserror::Error)]
pub enum CartError {
    /// The catalogue item is missing the fields a cart line needs.
    #[error("invalid catalogue item {item_id}: {reason}")]
    InvalidItem { item_id: ItemId, reason: String },
    /// The requested quantity does not fit a line's quantity.
    #[error("quantity {quantity} for item {item_id} ({size}) is out of range")]
    QuantityOutOfRange {
        item_id: ItemId,
        size: Size,
        quantity: i64,
    },
}

// ---------------------------------------------------------------------------
// Aggregate impl
// ---------------------------------------------------------------------------

impl Aggregate for Cart {
    const AGGREGATE_TYPE: &'static str = "cart";
    type Command = CartCommand;
    type DomainEvent = CartEvent;
    type Error = CartError;

    fn handle(&self, cmd: CartCommand) -> Result<Vec<CartEvent>, CartError> {
        match cmd {
            CartCommand::AddItem { item, size } => {
                item.validate().map_err(|e| CartError::InvalidItem {
                    item_id: item.id,
                    reason: e.to_string(),
                })?;
                let key = LineKey::new(item.id, size);
                match self.line(key) {
                    Some(line) => {
                        let quantity = line.quantity.checked_add(1).ok_or(
                            CartError::QuantityOutOfRange {
                                item_id: item.id,
                                size,
                                quantity: i64::from(line.quantity) + 1,
                            },
                        )?;
                        Ok(vec![CartEvent::QuantityChanged { key, quantity }])
                    }
                    None => Ok(vec![CartEvent::LineAdded {
                        line: CartLine::from_item(&item, size),
                    }]),
                }
            }
            CartCommand::RemoveItem { item_id, size } => {
                let key = LineKey::new(item_id, size);
                if self.line(key).is_none() {
                    return Ok(vec![]);
                }
                Ok(vec![CartEvent::LineRemoved { key }])
            }
            CartCommand::UpdateQuantity {
                item_id,
                size,
                quantity,
            } => {
                let key = LineKey::new(item_id, size);
                let Some(line) = self.line(key) else {
                    return Ok(vec![]);
                };
                if quantity <= 0 {
                    return Ok(vec![CartEvent::LineRemoved { key }]);
                }
                let quantity =
                    u32::try_from(quantity).map_err(|_| CartError::QuantityOutOfRange {
                        item_id,
                        size,
                        quantity,
                    })?;
                if quantity == line.quantity {
                    return Ok(vec![]);
                }
                Ok(vec![CartEvent::QuantityChanged { key, quantity }])
            }
            CartCommand::Clear => {
                if self.is_empty() {
                    return Ok(vec![]);
                }
                Ok(vec![CartEvent::Cleared])
            }
        }
    }

    fn apply(mut self, event: &CartEvent) -> Self {
        match event {
            CartEvent::LineAdded { line } => {
                if self.position(line.key()).is_none() {
                    self.lines.push(line.clone());
                }
            }
            CartEvent::QuantityChanged { key, quantity } => {
                if let Some(pos) = self.position(*key) {
                    if *quantity == 0 {
                        self.lines.remove(pos);
                    } else {
                        self.lines[pos].quantity = *quantity;
                    }
                }
            }
            CartEvent::LineRemoved { key } => {
                self.lines.retain(|line| line.key() != *key);
            }
            CartEvent::Cleared => self.lines.clear(),
        }
        self
    }
}
