use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::error::{Result, StorageError};
use crate::models::AthleteRef;
use crate::record::Row;
use crate::schema::Table;
use crate::store::RecordStore;
use crate::value::SqlValue;

#[derive(Debug, Default)]
struct Tables {
    rows: BTreeMap<Table, BTreeMap<i64, Row>>,
    batches: Vec<(Table, usize)>,
}

/// In-process store with the same insert-or-ignore semantics as
/// [`crate::Database`]. Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    closed: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn rows(&self, table: Table) -> Vec<Row> {
        self.lock()
            .rows
            .get(&table)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn get(&self, table: Table, id: i64) -> Option<Row> {
        self.lock().rows.get(&table)?.get(&id).cloned()
    }

    /// Sizes of every bulk insert issued against `table`, in call order.
    pub fn batch_sizes(&self, table: Table) -> Vec<usize> {
        self.lock()
            .batches
            .iter()
            .filter(|(t, _)| *t == table)
            .map(|(_, size)| *size)
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_ignore(&self, table: Table, rows: &[Row]) -> Result<u64> {
        if rows.is_empty() {
            return Ok(0);
        }

        if let Some(column) = rows
            .iter()
            .flat_map(|row| row.columns())
            .find(|column| !table.has_column(column))
        {
            return Err(StorageError::ConstraintViolation(format!(
                "column \"{}\" of relation \"{}\" does not exist",
                column, table
            )));
        }

        let mut tables = self.lock();
        tables.batches.push((table, rows.len()));

        let stored = tables.rows.entry(table).or_default();
        let mut inserted = 0;
        for row in rows {
            if !stored.contains_key(&row.id()) {
                stored.insert(row.id(), row.clone());
                inserted += 1;
            }
        }

        Ok(inserted)
    }

    async fn list_athletes(&self, limit: i64) -> Result<Vec<AthleteRef>> {
        let text = |row: &Row, column: &str| {
            row.get(column)
                .and_then(SqlValue::as_text)
                .map(str::to_string)
        };

        let limit = usize::try_from(limit).unwrap_or(0);
        let athletes = self
            .rows(Table::Athletes)
            .iter()
            .filter_map(|row| {
                Some(AthleteRef {
                    id: row.id(),
                    firstname: text(row, "firstname"),
                    lastname: text(row, "lastname"),
                    live_id: text(row, "live_id").filter(|id| !id.is_empty())?,
                })
            })
            .take(limit)
            .collect();

        Ok(athletes)
    }

    async fn count(&self, table: Table) -> Result<i64> {
        let count = self.lock().rows.get(&table).map_or(0, BTreeMap::len);
        Ok(count as i64)
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_ignore_skips_existing_ids() {
        let store = MemoryStore::new();
        let first = vec![Row::new(1).with("name", Some("Club A"))];
        let second = vec![
            Row::new(1).with("name", Some("Club A (renamed)")),
            Row::new(2).with("name", Some("Club B")),
        ];

        assert_eq!(store.insert_ignore(Table::Organizations, &first).await.unwrap(), 1);
        assert_eq!(store.insert_ignore(Table::Organizations, &second).await.unwrap(), 1);

        let kept = store.get(Table::Organizations, 1).unwrap();
        assert_eq!(kept.get("name").and_then(SqlValue::as_text), Some("Club A"));
        assert_eq!(store.count(Table::Organizations).await.unwrap(), 2);
        assert_eq!(store.batch_sizes(Table::Organizations), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_duplicates_within_one_batch_count_once() {
        let store = MemoryStore::new();
        let rows = vec![Row::new(7), Row::new(7), Row::new(8)];

        let inserted = store.insert_ignore(Table::Categories, &rows).await.unwrap();
        assert_eq!(inserted, 2);
    }

    #[tokio::test]
    async fn test_unknown_column_is_rejected() {
        let store = MemoryStore::new();
        let rows = vec![Row::new(1).with("shoe_size", Some(44_i32))];

        let err = store.insert_ignore(Table::Athletes, &rows).await.unwrap_err();
        assert!(matches!(err, StorageError::ConstraintViolation(_)));
        assert!(store.batch_sizes(Table::Athletes).is_empty());
    }

    #[tokio::test]
    async fn test_list_athletes_requires_live_id_and_respects_limit() {
        let store = MemoryStore::new();
        let rows = vec![
            Row::new(3).with("live_id", Some("c3")),
            Row::new(1).with("live_id", Some("a1")).with("firstname", Some("Ann")),
            Row::new(2),
            Row::new(4).with("live_id", Some("d4")),
            Row::new(0).with("live_id", Some("")),
        ];
        store.insert_ignore(Table::Athletes, &rows).await.unwrap();

        let athletes = store.list_athletes(2).await.unwrap();
        let ids: Vec<i64> = athletes.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(athletes[0].firstname.as_deref(), Some("Ann"));

        let all: Vec<i64> = store
            .list_athletes(10)
            .await
            .unwrap()
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(all, vec![1, 3, 4]);
    }

    #[tokio::test]
    async fn test_close_marks_store_closed() {
        let store = MemoryStore::new();
        assert!(!store.is_closed());
        store.close().await;
        assert!(store.is_closed());
    }
}
