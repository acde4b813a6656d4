//! Recorded events: domain events stamped with identity and context.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::Aggregate;
use crate::command::CommandContext;

/// A domain event as recorded by the store.
///
/// Projections receive these after each mutation. `sequence` starts at 1
/// and increases by one per event within a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "A::DomainEvent: Serialize",
    deserialize = "A::DomainEvent: serde::de::DeserializeOwned"
))]
pub struct RecordedEvent<A: Aggregate> {
    /// Newly generated UUID v4 event ID.
    pub event_id: Uuid,
    /// Position of this event in the session's history.
    pub sequence: u64,
    /// The domain event itself.
    pub event: A::DomainEvent,
    /// Actor identity from the command context, if provided.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub actor: Option<String>,
    /// Correlation ID from the command context, if provided.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub correlation_id: Option<String>,
}

impl<A: Aggregate> RecordedEvent<A> {
    /// Stamp `event` with a fresh ID, the given sequence, and the context.
    pub fn new(event: A::DomainEvent, sequence: u64, ctx: &CommandContext) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            sequence,
            event,
            actor: ctx.actor.clone(),
            correlation_id: ctx.correlation_id.clone(),
        }
    }
}
