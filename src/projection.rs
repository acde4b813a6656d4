//! Read models kept up to date by the cart store.
//!
//! Every display surface that needs something other than the raw line list
//! (a badge count, a notice feed) implements [`Projection`] and is registered
//! on the [`CartStoreBuilder`](crate::CartStoreBuilder). The store applies
//! each recorded event to every projection synchronously, right after the
//! event is folded into the cart, so projections never lag the cart.

use std::any::Any;

use crate::cart::Cart;
use crate::event::RecordedEvent;

/// A read model derived from cart events.
///
/// # Contract
///
/// - [`apply`](Projection::apply) must be deterministic: given the same
///   sequence of events and cart states, it must produce the same state.
/// - `cart` is the state *after* `event` was applied. Projections that only
///   need totals should read them from `cart` rather than track them
///   incrementally.
pub trait Projection: Default + Clone + Send + Sync + 'static {
    /// Unique name, used as the registry key in the store.
    const NAME: &'static str;

    /// Apply a single recorded event.
    fn apply(&mut self, event: &RecordedEvent<Cart>, cart: &Cart);
}

/// Holds one projection's state and the last sequence it has seen.
pub(crate) struct ProjectionRunner<P: Projection> {
    state: P,
    last_sequence: u64,
}

impl<P: Projection> ProjectionRunner<P> {
    pub(crate) fn new() -> Self {
        Self {
            state: P::default(),
            last_sequence: 0,
        }
    }
}

/// Type-erased interface for projection runners.
///
/// Lets the store hold heterogeneous projections in one map without knowing
/// each concrete `P` type.
pub(crate) trait ProjectionApply: Send + Sync {
    /// Apply one event, skipping it if its sequence was already applied.
    fn apply_event(&mut self, event: &RecordedEvent<Cart>, cart: &Cart);

    /// Sequence of the last applied event (0 if none).
    fn position(&self) -> u64;

    /// Clone the current projection state into a type-erased box.
    ///
    /// The caller can downcast the returned `Box<dyn Any>` to the concrete
    /// projection type `P` to read the state.
    fn state_any(&self) -> Box<dyn Any + Send>;
}

impl<P: Projection> ProjectionApply for ProjectionRunner<P> {
    fn apply_event(&mut self, event: &RecordedEvent<Cart>, cart: &Cart) {
        if event.sequence <= self.last_sequence {
            return;
        }
        self.state.apply(event, cart);
        self.last_sequence = event.sequence;
        tracing::trace!(projection = P::NAME, sequence = event.sequence, "event applied");
    }

    fn position(&self) -> u64 {
        self.last_sequence
    }

    fn state_any(&self) -> Box<dyn Any + Send> {
        Box::new(self.state.clone())
    }
}
