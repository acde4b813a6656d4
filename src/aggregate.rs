//! Aggregate trait: pure decide/apply functions over in-memory state.

use serde::{Serialize, de::DeserializeOwned};

/// A domain aggregate whose state is derived from the events it produces.
///
/// The implementing type itself serves as the aggregate's state.
/// State changes only by folding domain events through [`apply`](Aggregate::apply).
///
/// # Contract
///
/// - [`handle`](Aggregate::handle) must be a pure decision function: no I/O, no side effects.
///   It validates a command against the current state and returns zero or more events.
/// - [`apply`](Aggregate::apply) must be a pure, total function. It takes ownership of
///   the current state and a reference to a domain event, returning the next state.
pub trait Aggregate:
    Default + Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Identifies this aggregate type (e.g. "cart"). Used in log fields.
    const AGGREGATE_TYPE: &'static str;

    /// The set of commands this aggregate can handle.
    type Command: Send + 'static;

    /// The set of events this aggregate can produce and apply.
    type DomainEvent: Serialize + DeserializeOwned + Send + Sync + Clone + 'static;

    /// Command rejection / validation error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Validate a command against the current state and produce events.
    ///
    /// Returns `Ok(vec![])` if the command is a no-op.
    /// Returns `Err` to reject the command.
    fn handle(&self, cmd: Self::Command) -> Result<Vec<Self::DomainEvent>, Self::Error>;

    /// Apply a single event to produce the next state.
    fn apply(self, event: &Self::DomainEvent) -> Self;
}

/// Rebuild aggregate state by folding `events` over the default state.
///
/// # Examples
///
/// ```
/// use pizzeria_cart::{Cart, CartEvent, replay};
///
/// let cart: Cart = replay(&[CartEvent::Cleared]);
/// assert!(cart.is_empty());
/// ```
pub fn replay<'a, A, I>(events: I) -> A
where
    A: Aggregate,
    I: IntoIterator<Item = &'a A::DomainEvent>,
{
    events
        .into_iter()
        .fold(A::default(), |state, event| state.apply(event))
}
