use storage::{Record, RecordStore, Row};

use crate::progress::{ProgressEvent, ProgressReporter};
use crate::{ImporterError, Result};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UpsertSummary {
    pub inserted: u64,
    pub chunks: usize,
}

impl UpsertSummary {
    pub fn merge(&mut self, other: UpsertSummary) {
        self.inserted += other.inserted;
        self.chunks += other.chunks;
    }
}

/// Writes collections in fixed-size chunks, one insert-or-ignore statement
/// per chunk, in input order.
pub struct ChunkedUpserter<'a> {
    store: &'a dyn RecordStore,
    reporter: &'a dyn ProgressReporter,
    chunk_size: usize,
}

impl<'a> ChunkedUpserter<'a> {
    pub fn new(
        store: &'a dyn RecordStore,
        reporter: &'a dyn ProgressReporter,
        chunk_size: usize,
    ) -> Self {
        Self {
            store,
            reporter,
            chunk_size,
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// A failing chunk aborts the call; chunks already written stay written.
    pub async fn upsert<R: Record + Sync>(&self, records: &[R]) -> Result<UpsertSummary> {
        if self.chunk_size == 0 {
            return Err(ImporterError::ConfigurationError(
                "chunk size must be at least 1".to_string(),
            ));
        }

        let total = records.len().div_ceil(self.chunk_size);
        let mut summary = UpsertSummary::default();

        for (index, chunk) in records.chunks(self.chunk_size).enumerate() {
            let rows: Vec<Row> = chunk.iter().map(Record::to_row).collect();
            let inserted = self.store.insert_ignore(R::TABLE, &rows).await?;

            summary.inserted += inserted;
            summary.chunks += 1;
            self.reporter.report(ProgressEvent::ChunkCompleted {
                table: R::TABLE,
                completed: index + 1,
                total,
                inserted,
            });
        }

        Ok(summary)
    }
}
