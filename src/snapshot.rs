//! Immutable point-in-time views of aggregate state published to subscribers.

use std::sync::Arc;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// A point-in-time snapshot of an aggregate's state and version.
///
/// `version` is the number of events folded into `state`. Subscribers can
/// compare versions to tell whether they have already rendered a snapshot.
/// `Clone` is cheap: the state is shared behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "A: Serialize", deserialize = "A: DeserializeOwned"))]
pub struct Snapshot<A> {
    /// The aggregate state at the time of the snapshot.
    pub state: Arc<A>,
    /// Number of events applied when the snapshot was taken.
    pub version: u64,
}

impl<A> Snapshot<A> {
    pub fn new(state: A, version: u64) -> Self {
        Self {
            state: Arc::new(state),
            version,
        }
    }
}

impl<A: Default> Default for Snapshot<A> {
    fn default() -> Self {
        Self::new(A::default(), 0)
    }
}
