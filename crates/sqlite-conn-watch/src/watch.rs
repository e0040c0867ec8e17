//! Reactive query streams.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio_stream::Stream;
use tracing::trace;

use sqlite_conn_actor::{Connection, Queryable, Result, Row, SqlArgs};

use crate::stream::ChangeFeedStream;
use crate::throttle::Throttle;

/// Default throttle interval for [`WatchExt::watch`].
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(30);

type QueryFuture = Pin<Box<dyn Future<Output = Result<Vec<Row>>> + Send>>;

/// A lazy, infinite stream of result sets for one query.
///
/// On first poll the query runs once and its result is emitted. After
/// that, every coalesced tick of the connection's change feed re-runs the
/// query and emits the fresh result set. Query failures are emitted as
/// `Err` items; the stream keeps going. The stream ends only when the
/// consumer drops it (or the change feed itself is dropped); a query
/// already accepted by the worker runs to completion there regardless.
pub struct WatchStream {
   conn: Connection,
   sql: String,
   args: SqlArgs,
   ticks: Throttle<ChangeFeedStream>,
   query: Option<QueryFuture>,
   primed: bool,
}

impl WatchStream {
   fn refresh(&self) -> QueryFuture {
      let conn = self.conn.clone();
      let sql = self.sql.clone();
      let args = self.args.clone();
      Box::pin(async move { conn.get_all(&sql, args).await })
   }
}

impl Stream for WatchStream {
   type Item = Result<Vec<Row>>;

   fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
      let this = self.get_mut();

      if !this.primed {
         this.primed = true;
         trace!(sql = %this.sql, "watch subscribed; running initial query");
         this.query = Some(this.refresh());
      }

      loop {
         // An in-flight query takes priority; ticks arriving meanwhile
         // stay buffered in the feed and coalesce into the next refresh.
         if let Some(query) = this.query.as_mut() {
            match query.as_mut().poll(cx) {
               Poll::Ready(result) => {
                  this.query = None;
                  return Poll::Ready(Some(result));
               }
               Poll::Pending => return Poll::Pending,
            }
         }

         match Pin::new(&mut this.ticks).poll_next(cx) {
            Poll::Ready(Some(())) => {
               trace!(sql = %this.sql, "change tick; re-running watched query");
               this.query = Some(this.refresh());
            }
            Poll::Ready(None) => return Poll::Ready(None),
            Poll::Pending => return Poll::Pending,
         }
      }
   }
}

/// Reactive extension for [`Connection`].
pub trait WatchExt {
   /// Watch a query: emit its result set now and again after every
   /// coalesced burst of change notifications.
   ///
   /// `throttle` bounds the refresh rate (default 30ms): notifications
   /// arriving within one interval collapse into a single re-query.
   /// Changes are observed through the connection's group feed; a group
   /// nothing ever notifies yields only the initial result set.
   fn watch(&self, sql: impl Into<String>, args: SqlArgs, throttle: Option<Duration>)
   -> WatchStream;
}

impl WatchExt for Connection {
   fn watch(
      &self,
      sql: impl Into<String>,
      args: SqlArgs,
      throttle: Option<Duration>,
   ) -> WatchStream {
      let rx = self.subscribe_changes();

      WatchStream {
         conn: self.clone(),
         sql: sql.into(),
         args,
         ticks: Throttle::new(
            ChangeFeedStream::new(rx),
            throttle.unwrap_or(DEFAULT_THROTTLE),
         ),
         query: None,
         primed: false,
      }
   }
}
