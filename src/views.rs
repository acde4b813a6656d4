//! Built-in projections for the cart widgets.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartEvent, LineKey};
use crate::event::RecordedEvent;
use crate::money::Money;
use crate::projection::Projection;

// ---------------------------------------------------------------------------
// CartBadge
// ---------------------------------------------------------------------------

/// Item count and subtotal shown on the floating cart button.
///
/// Re-derived from the cart after every event so it can never disagree with
/// the cart page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartBadge {
    pub total_items: u64,
    pub subtotal: Money,
}

impl Projection for CartBadge {
    const NAME: &'static str = "cart-badge";

    fn apply(&mut self, _event: &RecordedEvent<Cart>, cart: &Cart) {
        self.total_items = cart.total_items();
        self.subtotal = cart.total_price();
    }
}

// ---------------------------------------------------------------------------
// ActivityFeed
// ---------------------------------------------------------------------------

/// Number of entries kept by [`ActivityFeed`].
pub const ACTIVITY_FEED_CAPACITY: usize = 20;

/// What happened to the cart, in display terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityKind {
    Added,
    QuantityChanged,
    Removed,
    Cleared,
}

/// One entry in the [`ActivityFeed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub sequence: u64,
    pub kind: ActivityKind,
    /// Affected line, absent for [`ActivityKind::Cleared`].
    pub key: Option<LineKey>,
    /// Item name when the line still exists or was just added.
    pub name: Option<String>,
    /// Line quantity after the change (0 when removed).
    pub quantity: u32,
    pub actor: Option<String>,
}

/// The most recent cart changes, newest first.
///
/// Backs the "added to cart" notices; bounded to
/// [`ACTIVITY_FEED_CAPACITY`] entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityFeed {
    pub entries: VecDeque<Activity>,
}

impl ActivityFeed {
    pub fn latest(&self) -> Option<&Activity> {
        self.entries.front()
    }
}

impl Projection for ActivityFeed {
    const NAME: &'static str = "activity-feed";

    fn apply(&mut self, recorded: &RecordedEvent<Cart>, cart: &Cart) {
        let (kind, key) = match &recorded.event {
            CartEvent::LineAdded { line } => (ActivityKind::Added, Some(line.key())),
            CartEvent::QuantityChanged { key, .. } => (ActivityKind::QuantityChanged, Some(*key)),
            CartEvent::LineRemoved { key } => (ActivityKind::Removed, Some(*key)),
            CartEvent::Cleared => (ActivityKind::Cleared, None),
        };
        let line = key.and_then(|k| cart.line(k));

        self.entries.push_front(Activity {
            sequence: recorded.sequence,
            kind,
            key,
            name: line.map(|l| l.name.clone()),
            quantity: line.map_or(0, |l| l.quantity),
            actor: recorded.actor.clone(),
        });
        self.entries.truncate(ACTIVITY_FEED_CAPACITY);
    }
}
