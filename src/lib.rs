//! Cart store, menu catalogue, and pricing model for a pizzeria ordering flow.

mod aggregate;
pub use aggregate::{Aggregate, replay};
mod cart;
pub use cart::{Cart, CartCommand, CartError, CartEvent, CartLine, LineKey};
mod catalogue;
pub use catalogue::{Catalogue, CatalogueItem, Category, ItemId, MAX_ITEM_PRICE, TagFilter};
mod command;
mod error;
mod event;
mod money;
mod pricing;
mod projection;
mod size;
mod snapshot;
mod store;
mod views;

pub use command::CommandContext;
pub use error::{CatalogueError, ProjectionError};
pub use event::RecordedEvent;
pub use money::{Money, ORE_PER_KRONA};
pub use pricing::{OrderSummary, PricingConfig};
pub use projection::Projection;
pub use size::{ParseSizeError, Size};
pub use snapshot::Snapshot;
pub use store::{CartStore, CartStoreBuilder, DEFAULT_HISTORY_CAPACITY};
pub use views::{ACTIVITY_FEED_CAPACITY, Activity, ActivityFeed, ActivityKind, CartBadge};
