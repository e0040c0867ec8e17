//! Change-notification feed consumed by reactive queries.

use tokio::sync::broadcast;
use tracing::trace;

/// A single "something changed" notification.
///
/// No payload contract is assumed beyond the fact that a change happened.
/// The optional table name is diagnostics only; consumers must not rely
/// on it being present.
#[derive(Debug, Clone, Default)]
pub struct ChangeEvent {
   pub table: Option<String>,
}

impl ChangeEvent {
   pub fn for_table(table: impl Into<String>) -> Self {
      Self {
         table: Some(table.into()),
      }
   }
}

/// Default capacity of the change broadcast channel.
pub const DEFAULT_CHANGE_CAPACITY: usize = 256;

/// Broadcast feed of change events for one logical database.
///
/// Owned by the database group; the external change-detection mechanism
/// publishes into it through the group. Each subscriber gets an
/// independent receiver. A feed with no subscribers silently drops
/// notifications. A slow subscriber may lag and miss events; reactive
/// consumers treat a lag as "a change happened" and re-query.
#[derive(Debug, Clone)]
pub(crate) struct ChangeFeed {
   tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
   pub fn new(capacity: usize) -> Self {
      let (tx, _) = broadcast::channel(capacity);
      Self { tx }
   }

   /// Publish a change event to all current subscribers.
   pub fn notify(&self, event: ChangeEvent) {
      trace!(table = ?event.table, "publishing change event");
      let _ = self.tx.send(event);
   }

   /// Subscribe to the feed. Only events published after this call are
   /// delivered to the returned receiver.
   pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
      self.tx.subscribe()
   }
}
