use async_trait::async_trait;

use crate::error::Result;
use crate::models::AthleteRef;
use crate::record::Row;
use crate::schema::Table;

/// Write side of the import: insert-or-ignore is the only write mode.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts `rows` in one statement, skipping any row whose id already
    /// exists. Returns the number of rows actually inserted.
    async fn insert_ignore(&self, table: Table, rows: &[Row]) -> Result<u64>;

    /// Athletes that carry a live id, ordered by id, at most `limit`.
    async fn list_athletes(&self, limit: i64) -> Result<Vec<AthleteRef>>;

    async fn count(&self, table: Table) -> Result<i64>;

    async fn close(&self);
}
