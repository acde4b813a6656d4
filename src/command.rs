//! Command context passed alongside cart commands.

use serde::{Deserialize, Serialize};

/// Cross-cutting metadata passed alongside a command.
///
/// Identifies which display surface issued the command without polluting
/// the `Command` or `DomainEvent` types. Fields are copied onto each
/// [`RecordedEvent`](crate::RecordedEvent) and into log spans.
///
/// # Examples
///
/// ```
/// use pizzeria_cart::CommandContext;
///
/// let ctx = CommandContext::default()
///     .with_actor("menu-grid")
///     .with_correlation_id("click-42");
///
/// assert_eq!(ctx.actor.as_deref(), Some("menu-grid"));
/// assert_eq!(ctx.correlation_id.as_deref(), Some("click-42"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandContext {
    /// The surface issuing the command (e.g. "menu-grid", "cart-page").
    pub actor: Option<String>,
    /// Correlation ID tying several commands to one user interaction.
    pub correlation_id: Option<String>,
}

impl CommandContext {
    /// Set the actor identity.
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Set the correlation ID.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }
}
