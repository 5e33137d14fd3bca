use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::query_builder::Separated;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use crate::error::{Result, StorageError};
use crate::models::AthleteRef;
use crate::record::Row;
use crate::schema::Table;
use crate::store::RecordStore;
use crate::value::SqlValue;

/// PostgreSQL accepts at most this many bind parameters per statement.
pub const MAX_BIND_PARAMS: usize = u16::MAX as usize;

/// PostgreSQL-backed store. Cheap to clone; clones share the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

/// Connections opened when the caller has no concurrency of its own.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Pool size that lets `concurrency` writers each hold a connection, so no
/// writer waits on the pool's acquire timeout.
pub fn pool_size(concurrency: usize) -> u32 {
    u32::try_from(concurrency)
        .unwrap_or(u32::MAX)
        .max(DEFAULT_MAX_CONNECTIONS)
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        Self::connect(database_url, DEFAULT_MAX_CONNECTIONS).await
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Largest number of rows one insert into `table` can carry.
pub fn max_rows_per_statement(table: Table) -> usize {
    MAX_BIND_PARAMS / table.columns().len()
}

fn push_value(builder: &mut Separated<'_, '_, Postgres, &'static str>, value: &SqlValue) {
    match value {
        SqlValue::BigInt(v) => builder.push_bind(*v),
        SqlValue::Int(v) => builder.push_bind(*v),
        SqlValue::Numeric(v) => builder.push_bind(*v),
        SqlValue::Bool(v) => builder.push_bind(*v),
        SqlValue::Text(v) => builder.push_bind(v.clone()),
        SqlValue::Date(v) => builder.push_bind(*v),
        SqlValue::Opaque(v) => builder.push_bind(v.to_text()),
    };
}

/// Rows in ascending id order. Concurrent statements then take their row
/// locks in the same order and cannot deadlock on shared ids.
fn lock_order(rows: &[Row]) -> Vec<&Row> {
    let mut ordered: Vec<&Row> = rows.iter().collect();
    ordered.sort_by_key(|row| row.id());
    ordered
}

fn build_insert_ignore(table: Table, rows: &[Row]) -> QueryBuilder<'static, Postgres> {
    let columns = table.columns();

    let mut query = QueryBuilder::new(format!("INSERT INTO {} (", table.name()));
    {
        let mut separated = query.separated(", ");
        for column in columns {
            separated.push(format!("\"{}\"", column));
        }
    }
    query.push(") ");

    query.push_values(lock_order(rows), |mut tuple, row| {
        for column in columns {
            match row.get(column) {
                Some(value) => push_value(&mut tuple, value),
                None => {
                    tuple.push("DEFAULT");
                }
            }
        }
    });
    query.push(" ON CONFLICT (id) DO NOTHING");

    query
}

#[async_trait]
impl RecordStore for Database {
    async fn insert_ignore(&self, table: Table, rows: &[Row]) -> Result<u64> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut query = build_insert_ignore(table, rows);
        let result = query
            .build()
            .execute(&self.pool)
            .await
            .map_err(StorageError::classify)?;

        debug!(
            "{}: {} of {} rows inserted",
            table,
            result.rows_affected(),
            rows.len()
        );

        Ok(result.rows_affected())
    }

    async fn list_athletes(&self, limit: i64) -> Result<Vec<AthleteRef>> {
        let athletes = sqlx::query_as::<_, AthleteRef>(
            r#"
            SELECT id, firstname, lastname, live_id
            FROM athletes
            WHERE live_id IS NOT NULL AND live_id <> ''
            ORDER BY id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(athletes)
    }

    async fn count(&self, table: Table) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table.name()))
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_uses_default_for_unset_columns() {
        let rows = vec![
            Row::new(1).with("name", Some("Club A")),
            Row::new(2).with("name", Some("Club B")).with("alias", Some("CB")),
        ];
        let query = build_insert_ignore(Table::Organizations, &rows);
        let sql = query.sql();

        assert!(sql.starts_with("INSERT INTO organizations (\"id\", \"fed_number\""));
        assert!(sql.ends_with("ON CONFLICT (id) DO NOTHING"));
        assert!(sql.contains("DEFAULT"));
        assert!(!sql.contains("NULL"));
        // id + name on the first row, id + name + alias on the second
        assert!(sql.contains("$5"));
        assert!(!sql.contains("$6"));
    }

    #[test]
    fn test_rows_are_bound_in_ascending_id_order() {
        let rows = vec![
            Row::new(30),
            Row::new(10),
            Row::new(20).with("name", Some("Club B")),
        ];

        let ids: Vec<i64> = lock_order(&rows).iter().map(|row| row.id()).collect();
        assert_eq!(ids, vec![10, 20, 30]);

        // only id 20 carries a name, so its tuple is the second one
        let query = build_insert_ignore(Table::Organizations, &rows);
        let sql = query.sql();
        let second_tuple = sql.find("($2").unwrap();
        let name_bind = sql.find("$3").unwrap();
        assert!(sql.contains("($1, DEFAULT"));
        assert!(second_tuple < name_bind);
        assert!(sql.contains("($4, DEFAULT"));
    }

    #[test]
    fn test_pool_fits_concurrency() {
        assert_eq!(pool_size(16), 16);
        assert_eq!(pool_size(1), DEFAULT_MAX_CONNECTIONS);
        assert_eq!(pool_size(usize::MAX), u32::MAX);
    }

    #[test]
    fn test_max_rows_fits_widest_table() {
        for table in Table::ALL {
            let rows = max_rows_per_statement(table);
            assert!(rows * table.columns().len() <= MAX_BIND_PARAMS);
            assert!(rows >= 1000, "{} cannot hold a default chunk", table);
        }
    }
}
