//! The cart store: sole owner of the cart and its mutation/query surface.
//!
//! A [`CartStore`] is built once per browsing session via
//! [`CartStoreBuilder`] and handed explicitly to every surface that needs
//! it. Mutations go through the pure [`Aggregate`] functions on [`Cart`];
//! after each successful mutation the store records the events, updates the
//! registered projections, and publishes a fresh [`Snapshot`] to
//! subscribers.

use std::collections::{HashMap, VecDeque};

use tokio::sync::watch;
use uuid::Uuid;

use crate::aggregate::Aggregate;
use crate::cart::{Cart, CartCommand, CartError, CartEvent, CartLine, LineKey};
use crate::catalogue::{CatalogueItem, ItemId};
use crate::command::CommandContext;
use crate::error::ProjectionError;
use crate::event::RecordedEvent;
use crate::money::Money;
use crate::pricing::{OrderSummary, PricingConfig};
use crate::projection::{Projection, ProjectionApply, ProjectionRunner};
use crate::size::Size;
use crate::snapshot::Snapshot;

/// Number of recorded events a store keeps unless the builder says otherwise.
pub const DEFAULT_HISTORY_CAPACITY: usize = 1_000;

/// Type-erased projection map keyed by projection name.
type ProjectionMap = HashMap<&'static str, Box<dyn ProjectionApply>>;

/// Builder for [`CartStore`].
///
/// # Examples
///
/// ```
/// use pizzeria_cart::{CartBadge, CartStore, Money, PricingConfig};
///
/// let store = CartStore::builder()
///     .pricing(PricingConfig {
///         free_delivery_threshold: Money::from_kronor(250),
///         ..PricingConfig::default()
///     })
///     .projection::<CartBadge>()
///     .build();
///
/// assert_eq!(store.total_items(), 0);
/// ```
pub struct CartStoreBuilder {
    pricing: PricingConfig,
    history_capacity: usize,
    projections: ProjectionMap,
}

impl Default for CartStoreBuilder {
    fn default() -> Self {
        Self {
            pricing: PricingConfig::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            projections: ProjectionMap::new(),
        }
    }
}

impl CartStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `capacity` recorded events; the oldest are dropped
    /// first. Defaults to [`DEFAULT_HISTORY_CAPACITY`].
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Set the delivery pricing rules. Defaults to [`PricingConfig::default`].
    pub fn pricing(mut self, pricing: PricingConfig) -> Self {
        self.pricing = pricing;
        self
    }

    /// Register a projection. Registering the same type twice keeps one.
    pub fn projection<P: Projection>(mut self) -> Self {
        self.projections
            .insert(P::NAME, Box::new(ProjectionRunner::<P>::new()));
        self
    }

    /// Build an empty store with a fresh session ID.
    pub fn build(self) -> CartStore {
        let (snapshots, _) = watch::channel(Snapshot::default());
        let session_id = Uuid::new_v4();
        tracing::debug!(
            session_id = %session_id,
            projections = self.projections.len(),
            "cart store created"
        );
        CartStore {
            session_id,
            cart: Cart::default(),
            version: 0,
            history: VecDeque::new(),
            history_capacity: self.history_capacity,
            pricing: self.pricing,
            projections: self.projections,
            snapshots,
        }
    }
}

/// Owns the session's [`Cart`] and exposes the only way to change it.
///
/// All operations are synchronous and run to completion. Mutations need
/// `&mut self`; display surfaces that only read can hold a
/// [`watch::Receiver`] from [`subscribe`](CartStore::subscribe) instead of a
/// reference to the store.
pub struct CartStore {
    session_id: Uuid,
    cart: Cart,
    version: u64,
    history: VecDeque<RecordedEvent<Cart>>,
    history_capacity: usize,
    pricing: PricingConfig,
    projections: ProjectionMap,
    snapshots: watch::Sender<Snapshot<Cart>>,
}

// Manual `Debug` because projection runners are trait objects.
impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("session_id", &self.session_id)
            .field("version", &self.version)
            .field("lines", &self.cart.lines().len())
            .finish()
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    /// An empty store with default pricing and no projections.
    pub fn new() -> Self {
        CartStoreBuilder::new().build()
    }

    pub fn builder() -> CartStoreBuilder {
        CartStoreBuilder::new()
    }

    /// Execute a command on behalf of the surface described by `ctx`.
    ///
    /// No-op commands (removing an absent line, clearing an empty cart)
    /// return `Ok` with no events and notify nobody.
    ///
    /// # Returns
    ///
    /// The domain events that were applied, in order.
    ///
    /// # Errors
    ///
    /// Returns [`CartError`] if the command violates the caller contract.
    /// The cart is unchanged in that case.
    pub fn execute(
        &mut self,
        cmd: CartCommand,
        ctx: &CommandContext,
    ) -> Result<Vec<CartEvent>, CartError> {
        let _span = tracing::info_span!(
            "execute",
            aggregate_type = Cart::AGGREGATE_TYPE,
            session_id = %self.session_id,
            actor = ctx.actor.as_deref().unwrap_or("-"),
        )
        .entered();

        let events = self.cart.handle(cmd).inspect_err(|e| {
            tracing::warn!(error = %e, "command rejected");
        })?;

        if events.is_empty() {
            tracing::debug!("no-op command");
            return Ok(events);
        }

        for event in &events {
            self.version += 1;
            let cart = std::mem::take(&mut self.cart);
            self.cart = cart.apply(event);

            let recorded = RecordedEvent::new(event.clone(), self.version, ctx);
            for runner in self.projections.values_mut() {
                runner.apply_event(&recorded, &self.cart);
                debug_assert_eq!(runner.position(), self.version);
            }
            self.history.push_back(recorded);
        }
        while self.history.len() > self.history_capacity {
            self.history.pop_front();
        }

        self.snapshots
            .send_replace(Snapshot::new(self.cart.clone(), self.version));

        tracing::info!(
            count = events.len(),
            version = self.version,
            total_items = self.cart.total_items(),
            "events applied"
        );

        Ok(events)
    }

    /// Add one unit of `item` in `size`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidItem`] for a malformed item, or
    /// [`CartError::QuantityOutOfRange`] if the line is already at the
    /// maximum quantity.
    pub fn add_item(&mut self, item: &CatalogueItem, size: Size) -> Result<(), CartError> {
        self.execute(
            CartCommand::AddItem {
                item: item.clone(),
                size,
            },
            &CommandContext::default(),
        )
        .map(drop)
    }

    /// Remove the line for `(item_id, size)`. Absent lines are a no-op.
    ///
    /// # Errors
    ///
    /// Never fails for this command; the `Result` matches [`execute`](Self::execute).
    pub fn remove_item(&mut self, item_id: ItemId, size: Size) -> Result<(), CartError> {
        self.execute(
            CartCommand::RemoveItem { item_id, size },
            &CommandContext::default(),
        )
        .map(drop)
    }

    /// Set the quantity of `(item_id, size)` exactly. `quantity <= 0`
    /// removes the line. Absent lines are a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityOutOfRange`] if `quantity` exceeds the
    /// largest representable line quantity.
    pub fn update_quantity(
        &mut self,
        item_id: ItemId,
        size: Size,
        quantity: i64,
    ) -> Result<(), CartError> {
        self.execute(
            CartCommand::UpdateQuantity {
                item_id,
                size,
                quantity,
            },
            &CommandContext::default(),
        )
        .map(drop)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Never fails for this command; the `Result` matches [`execute`](Self::execute).
    pub fn clear_cart(&mut self) -> Result<(), CartError> {
        self.execute(CartCommand::Clear, &CommandContext::default())
            .map(drop)
    }

    /// Sum of line quantities; 0 for an empty cart.
    pub fn total_items(&self) -> u64 {
        self.cart.total_items()
    }

    /// Subtotal with size multipliers applied, recomputed on every call.
    pub fn total_price(&self) -> Money {
        self.cart.total_price()
    }

    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    pub fn line(&self, item_id: ItemId, size: Size) -> Option<&CartLine> {
        self.cart.line(LineKey::new(item_id, size))
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Totals for the floating widget and the checkout hand-off.
    pub fn order_summary(&self) -> OrderSummary {
        OrderSummary::for_cart(&self.cart, &self.pricing)
    }

    pub fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Number of events applied since the store was built.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The most recent recorded events, oldest first.
    ///
    /// Holds the whole session until the history capacity is reached; after
    /// that the oldest events are dropped and `history().len()` falls behind
    /// [`version`](CartStore::version).
    pub fn history(&self) -> &VecDeque<RecordedEvent<Cart>> {
        &self.history
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> Snapshot<Cart> {
        self.snapshots.borrow().clone()
    }

    /// Subscribe to cart snapshots.
    ///
    /// The receiver sees the current snapshot immediately and is marked
    /// changed after every mutation that produced events.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<Cart>> {
        self.snapshots.subscribe()
    }

    /// Return a clone of a registered projection's current state.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError::NotRegistered`] if `P` was not registered
    /// on the builder.
    pub fn projection<P: Projection>(&self) -> Result<P, ProjectionError> {
        let runner = self
            .projections
            .get(P::NAME)
            .ok_or(ProjectionError::NotRegistered(P::NAME))?;
        runner
            .state_any()
            .downcast::<P>()
            .map(|b| *b)
            .map_err(|_| ProjectionError::TypeMismatch(P::NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::test_fixtures::pizza;
    use crate::views::{ActivityFeed, ActivityKind, CartBadge};

    fn store() -> CartStore {
        CartStore::builder()
            .projection::<CartBadge>()
            .projection::<ActivityFeed>()
            .build()
    }

    #[test]
    fn add_twice_merges_and_prices_at_read_time() {
        let mut store = store();
        let margherita = pizza(1, 79);
        store.add_item(&margherita, Size::Medium).unwrap();
        store.add_item(&margherita, Size::Medium).unwrap();

        assert_eq!(store.lines().len(), 1);
        assert_eq!(store.line(ItemId(1), Size::Medium).unwrap().quantity, 2);
        assert_eq!(store.total_price(), Money::from_ore(18_170));
        assert_eq!(store.total_price().to_string(), "182 kr");
    }

    #[test]
    fn version_counts_applied_events_only() {
        let mut store = store();
        store.add_item(&pizza(1, 79), Size::Small).unwrap();
        store.remove_item(ItemId(9), Size::Small).unwrap();
        store.update_quantity(ItemId(9), Size::Small, 3).unwrap();

        assert_eq!(store.version(), 1);
        assert_eq!(store.history().len(), 1);
    }

    #[test]
    fn history_is_stamped_with_context() {
        let mut store = store();
        let ctx = CommandContext::default()
            .with_actor("menu-grid")
            .with_correlation_id("tap-1");
        store
            .execute(
                CartCommand::AddItem {
                    item: pizza(1, 79),
                    size: Size::Small,
                },
                &ctx,
            )
            .unwrap();

        let recorded = &store.history()[0];
        assert_eq!(recorded.sequence, 1);
        assert_eq!(recorded.actor.as_deref(), Some("menu-grid"));
        assert_eq!(recorded.correlation_id.as_deref(), Some("tap-1"));
    }

    #[test]
    fn history_keeps_only_the_newest_events() {
        let mut store = CartStore::builder().history_capacity(2).build();
        store.add_item(&pizza(1, 79), Size::Small).unwrap();
        store.add_item(&pizza(2, 89), Size::Small).unwrap();
        store.add_item(&pizza(3, 99), Size::Small).unwrap();

        assert_eq!(store.version(), 3);
        assert_eq!(store.history().len(), 2);
        let sequences: Vec<u64> = store.history().iter().map(|r| r.sequence).collect();
        assert_eq!(sequences, vec![2, 3]);
        assert_eq!(store.total_items(), 3);
    }

    #[test]
    fn rejected_command_leaves_store_unchanged() {
        let mut store = store();
        store.add_item(&pizza(1, 79), Size::Small).unwrap();
        let before = store.snapshot();

        let err = store
            .update_quantity(ItemId(1), Size::Small, i64::MAX)
            .unwrap_err();
        assert!(matches!(err, CartError::QuantityOutOfRange { .. }));
        assert_eq!(store.snapshot(), before);
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn projections_follow_every_mutation() {
        let mut store = store();
        store.add_item(&pizza(1, 79), Size::Medium).unwrap();
        store.add_item(&pizza(2, 99), Size::Large).unwrap();
        store.update_quantity(ItemId(2), Size::Large, 3).unwrap();

        let badge = store.projection::<CartBadge>().unwrap();
        assert_eq!(badge.total_items, store.total_items());
        assert_eq!(badge.subtotal, store.total_price());

        let feed = store.projection::<ActivityFeed>().unwrap();
        assert_eq!(feed.entries.len(), 3);
        assert_eq!(feed.latest().unwrap().kind, ActivityKind::QuantityChanged);
        assert_eq!(feed.latest().unwrap().quantity, 3);
    }

    #[test]
    fn unregistered_projection_is_an_error() {
        let store = CartStore::new();
        let err = store.projection::<CartBadge>().unwrap_err();
        assert!(matches!(err, ProjectionError::NotRegistered("cart-badge")));
    }

    #[test]
    fn subscriber_sees_latest_snapshot() {
        let mut store = store();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.add_item(&pizza(1, 79), Size::Small).unwrap();
        assert!(rx.has_changed().unwrap());

        let snap = rx.borrow_and_update().clone();
        assert_eq!(snap.version, 1);
        assert_eq!(snap.state.total_items(), 1);
    }

    #[test]
    fn noop_does_not_notify_subscribers() {
        let mut store = store();
        let rx = store.subscribe();
        store.clear_cart().unwrap();
        store.remove_item(ItemId(1), Size::Small).unwrap();
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn snapshot_is_immutable_after_later_mutations() {
        let mut store = store();
        store.add_item(&pizza(1, 79), Size::Small).unwrap();
        let snap = store.snapshot();
        store.clear_cart().unwrap();

        assert_eq!(snap.state.total_items(), 1);
        assert_eq!(store.snapshot().state.total_items(), 0);
    }

    #[test]
    fn order_summary_uses_configured_pricing() {
        let mut store = CartStore::builder()
            .pricing(PricingConfig {
                free_delivery_threshold: Money::from_kronor(150),
                delivery_fee: Money::from_kronor(39),
            })
            .build();
        store.add_item(&pizza(1, 79), Size::Small).unwrap();
        assert_eq!(store.order_summary().delivery_fee, Money::from_kronor(39));

        store.add_item(&pizza(1, 79), Size::Small).unwrap();
        let summary = store.order_summary();
        assert_eq!(summary.subtotal, Money::from_kronor(158));
        assert!(summary.has_free_delivery());
    }

    #[test]
    fn sessions_get_distinct_ids() {
        assert_ne!(CartStore::new().session_id(), CartStore::new().session_id());
    }

    #[test]
    fn debug_format_is_readable() {
        let store = CartStore::new();
        let debug_output = format!("{store:?}");
        assert!(debug_output.contains("CartStore"));
        assert!(debug_output.contains("version: 0"));
    }
}
