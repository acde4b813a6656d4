//! Crate-level error types for catalogue loading and read-model access.

use crate::catalogue::ItemId;

/// Error returned when a catalogue cannot be loaded or fails validation.
#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    /// Disk I/O failure while reading the catalogue file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The catalogue is not a valid JSON array of items.
    #[error("malformed catalogue: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two items share the same identifier.
    #[error("duplicate catalogue item id {0}")]
    DuplicateId(ItemId),

    /// An item has an empty display name.
    #[error("catalogue item {0} has an empty name")]
    EmptyName(ItemId),

    /// An item's base price is zero or above the menu ceiling.
    #[error("catalogue item {0} has an invalid base price")]
    InvalidPrice(ItemId),
}

/// Error returned when reading a projection from the store fails.
#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    /// No projection with this name was registered on the builder.
    #[error("projection '{0}' not registered")]
    NotRegistered(&'static str),

    /// A projection is registered under this name but with a different type.
    #[error("projection '{0}' type mismatch")]
    TypeMismatch(&'static str),
}
