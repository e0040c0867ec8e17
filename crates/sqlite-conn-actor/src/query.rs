//! Shared query surface over any read-capable context.

use crate::Result;
use crate::engine::{Row, SqlArgs};
use crate::error::Error;

/// Read queries available on connections and transaction contexts alike.
///
/// `get_all` is the single required capability; `get` and `get_optional`
/// are provided on top of it, so every implementor exposes the same
/// surface by delegation.
#[allow(async_fn_in_trait)]
pub trait Queryable {
   /// Execute a read-only-tagged query and return all result rows.
   async fn get_all(&self, sql: &str, args: SqlArgs) -> Result<Vec<Row>>;

   /// Execute a query and return the first row. Fails with
   /// [`Error::NoResult`] if the query returned no rows.
   async fn get(&self, sql: &str, args: SqlArgs) -> Result<Row> {
      self
         .get_all(sql, args)
         .await?
         .into_iter()
         .next()
         .ok_or(Error::NoResult)
   }

   /// Execute a query and return the first row, or `None` if the query
   /// returned no rows. An empty result set is an absent value, never an
   /// error.
   async fn get_optional(&self, sql: &str, args: SqlArgs) -> Result<Option<Row>> {
      Ok(self.get_all(sql, args).await?.into_iter().next())
   }
}
