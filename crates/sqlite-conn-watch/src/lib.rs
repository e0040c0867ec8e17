//! Reactive queries over [`sqlite_conn_actor`] connections.
//!
//! Turns a query plus a connection's change-notification feed into a lazy
//! stream of result sets: one emission up front, then one per coalesced
//! burst of change events.
//!
//! ## Core Types
//!
//! - **[`WatchExt`]**: extension trait adding `watch()` to `Connection`
//! - **[`WatchStream`]**: the reactive result-set stream
//! - **[`Throttle`]**: trailing-edge coalescing of a notification stream
//! - **[`ChangeFeedStream`]**: change feed as a `Stream`, lag-tolerant
//!
//! ## Usage
//!
//! ```no_run
//! use sqlite_conn_watch::WatchExt;
//! use tokio_stream::StreamExt;
//!
//! # async fn example(conn: sqlite_conn_actor::Connection) -> sqlite_conn_actor::Result<()> {
//! let mut results = conn.watch("SELECT v FROM t", vec![], None);
//! while let Some(rows) = results.next().await {
//!    let rows = rows?;
//!    println!("{} rows", rows.len());
//! }
//! # Ok(())
//! # }
//! ```

mod stream;
mod throttle;
mod watch;

pub use stream::ChangeFeedStream;
pub use throttle::Throttle;
pub use watch::{DEFAULT_THROTTLE, WatchExt, WatchStream};
