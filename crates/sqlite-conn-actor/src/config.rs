//! Configuration for connections and groups

use serde::{Deserialize, Serialize};

use crate::change::DEFAULT_CHANGE_CAPACITY;

/// Configuration fixed at connection construction.
///
/// # Examples
///
/// ```
/// use sqlite_conn_actor::ConnectionConfig;
///
/// // Use defaults (read-write, unnamed)
/// let config = ConnectionConfig::default();
///
/// // Customize
/// let config = ConnectionConfig::new()
///     .with_name("sync-worker")
///     .with_read_only(true);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionConfig {
   /// Optional debug name, used for the worker thread name and
   /// diagnostics. Not required to be unique.
   pub name: Option<String>,

   /// Open the engine handle read-only. Fixed for the connection's
   /// lifetime; every mutating statement will be rejected by the engine.
   pub read_only: bool,
}

impl ConnectionConfig {
   pub fn new() -> Self {
      Self::default()
   }

   pub fn with_name(mut self, name: impl Into<String>) -> Self {
      self.name = Some(name.into());
      self
   }

   pub fn with_read_only(mut self, read_only: bool) -> Self {
      self.read_only = read_only;
      self
   }
}

/// Configuration fixed at group construction.
///
/// # Examples
///
/// ```
/// use sqlite_conn_actor::{DatabaseGroup, GroupConfig};
///
/// let group = DatabaseGroup::with_config(
///     GroupConfig::new().with_change_channel_capacity(64),
/// );
/// # let _ = group;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupConfig {
   /// Capacity of the change broadcast channel. A subscriber that falls
   /// more than this many events behind lags and misses the overflow.
   pub change_channel_capacity: usize,
}

impl Default for GroupConfig {
   fn default() -> Self {
      Self {
         change_channel_capacity: DEFAULT_CHANGE_CAPACITY,
      }
   }
}

impl GroupConfig {
   pub fn new() -> Self {
      Self::default()
   }

   pub fn with_change_channel_capacity(mut self, capacity: usize) -> Self {
      self.change_channel_capacity = capacity;
      self
   }
}
