//! Grouping of connections that share one logical database.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::change::{ChangeEvent, ChangeFeed};
use crate::config::GroupConfig;
use crate::mutex::TimedMutex;

/// Shared state for all connections to one logical database.
///
/// Owns the global write lock that serializes write transactions across
/// connections, regardless of which connection object initiates them,
/// and the change feed that reactive queries subscribe to. The group is
/// an explicit value passed to every connection at construction (not a
/// hidden module-level singleton) and outlives any individual connection
/// that clones it.
#[derive(Debug, Clone)]
pub struct DatabaseGroup {
   write_lock: Arc<TimedMutex>,
   changes: ChangeFeed,
}

impl DatabaseGroup {
   /// Create a group with the default configuration.
   pub fn new() -> Self {
      Self::with_config(GroupConfig::default())
   }

   /// Create a group with an explicit configuration.
   pub fn with_config(config: GroupConfig) -> Self {
      Self {
         write_lock: Arc::new(TimedMutex::new("global write lock")),
         changes: ChangeFeed::new(config.change_channel_capacity),
      }
   }

   /// The write lock shared by every connection in this group.
   pub(crate) fn write_lock(&self) -> &Arc<TimedMutex> {
      &self.write_lock
   }

   /// True if a write transaction currently holds the global write lock.
   /// Diagnostics only.
   pub fn write_locked(&self) -> bool {
      self.write_lock.locked()
   }

   /// Publish a change event to every subscriber in the group.
   ///
   /// This is the hook the external change-detection mechanism calls.
   /// A group with no subscribers silently drops the event.
   pub fn notify_change(&self, event: ChangeEvent) {
      self.changes.notify(event);
   }

   /// Subscribe to the group's change feed. Only events published after
   /// this call are delivered to the returned receiver.
   pub fn subscribe_changes(&self) -> broadcast::Receiver<ChangeEvent> {
      self.changes.subscribe()
   }
}

impl Default for DatabaseGroup {
   fn default() -> Self {
      Self::new()
   }
}
