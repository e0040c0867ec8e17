//! # sqlite-conn-actor
//!
//! Concurrency and transaction coordination between async callers and an
//! embedded SQL engine whose native handle may only be touched by one
//! execution context at a time.
//!
//! ## Core Types
//!
//! - **[`Connection`]**: caller-facing handle with read/write transaction
//!   entry points; owns a private lock and a lazily-started worker
//! - **[`Worker`]**: dedicated thread exclusively owning one engine handle,
//!   processing commands strictly one at a time
//! - **[`ReadTransaction`]** / **[`WriteTransaction`]**: contexts bound to
//!   one open transaction, unusable once it ends
//! - **[`DatabaseGroup`]**: explicit owner of the global write lock and the
//!   change feed shared by all connections to one logical database
//! - **[`TimedMutex`]**: FIFO-fair async mutex with bounded acquisition
//! - **[`ChangeEvent`]**: "something changed" notification published through
//!   the group and consumed by reactive queries
//! - **[`Error`]**: error taxonomy for lock timeouts, closed transactions,
//!   read-only violations, and engine failures
//!
//! ## Architecture
//!
//! - **One worker per connection**: the engine handle is created inside the
//!   worker thread and never leaves it; commands arrive through an ordered
//!   inbox and replies return through one-shot result bridges
//! - **Two-level locking**: a private per-connection lock serializes all
//!   top-level operations on one handle; the group's global write lock
//!   serializes write transactions across connections
//! - **Budgeted waiting**: lock timeouts are a single budget spent across
//!   both acquisitions, and a timed-out waiter never runs its body
//! - **Rollback on error**: a failing transaction body triggers a
//!   best-effort `ROLLBACK`; the original error is what the caller sees
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use sqlite_conn_actor::{
//!    Connection, ConnectionConfig, DatabaseGroup, EngineFactory, Queryable,
//! };
//!
//! # async fn example(factory: Arc<dyn EngineFactory>) -> sqlite_conn_actor::Result<()> {
//! let group = DatabaseGroup::new();
//! let conn = Connection::new(
//!    Arc::clone(&factory),
//!    &group,
//!    ConnectionConfig::new().with_name("app"),
//! );
//!
//! // Single statements run in their own transaction
//! conn
//!    .execute("INSERT INTO users (name) VALUES (?)", vec!["Alice".into()])
//!    .await?;
//! let user = conn
//!    .get_optional("SELECT * FROM users WHERE id = ?", vec![1.into()])
//!    .await?;
//!
//! // Multi-statement transactions get a context
//! conn
//!    .write_transaction(None, |tx| async move {
//!       tx.execute("DELETE FROM sessions", vec![]).await?;
//!       tx.execute("DELETE FROM users", vec![]).await?;
//!       Ok(())
//!    })
//!    .await?;
//! # let _ = user;
//! # Ok(())
//! # }
//! ```

mod bridge;
mod change;
mod config;
mod connection;
mod engine;
mod error;
mod group;
mod mutex;
mod query;
mod transaction;
mod worker;

// Re-export public types
pub use bridge::{Completer, Waiter, bridge};
pub use change::{ChangeEvent, DEFAULT_CHANGE_CAPACITY};
pub use config::{ConnectionConfig, GroupConfig};
pub use connection::Connection;
pub use engine::{AccessMode, EngineFactory, EngineHandle, Row, SqlArgs};
pub use error::{EngineError, Error, READ_ONLY_CODE};
pub use group::DatabaseGroup;
pub use mutex::TimedMutex;
pub use query::Queryable;
pub use transaction::{ReadTransaction, WriteTransaction};
pub use worker::Worker;

/// A type alias for Results with our custom Error type
pub type Result<T> = std::result::Result<T, Error>;
