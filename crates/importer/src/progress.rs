use storage::Table;
use tracing::{debug, info};

use crate::pipeline::Stage;

/// Structured progress emitted by the import stages. Stages never format
/// progress text themselves; whoever drives them decides how to show it.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    StageStarted {
        stage: Stage,
    },
    Fetched {
        stage: Stage,
        records: usize,
    },
    ChunkCompleted {
        table: Table,
        completed: usize,
        total: usize,
        inserted: u64,
    },
    AthleteReconciled {
        completed: usize,
        total: usize,
        results: usize,
    },
    PrefixCompleted {
        prefix: char,
        athletes: usize,
        inserted: u64,
    },
    StageCompleted {
        stage: Stage,
        inserted: u64,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

impl<F> ProgressReporter for F
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    fn report(&self, event: ProgressEvent) {
        self(event)
    }
}

/// Logs stage-level events at `info` and per-chunk/per-athlete events at
/// `debug`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::StageStarted { stage } => info!("Importing {}", stage),
            ProgressEvent::Fetched { stage, records } => {
                info!("Fetched {} {}", records, stage)
            }
            ProgressEvent::ChunkCompleted {
                table,
                completed,
                total,
                inserted,
            } => debug!(
                "Inserted {}/{} chunks into {} ({} new rows)",
                completed, total, table, inserted
            ),
            ProgressEvent::AthleteReconciled {
                completed,
                total,
                results,
            } => debug!(
                "Reconciled {}/{} athletes ({} results)",
                completed, total, results
            ),
            ProgressEvent::PrefixCompleted {
                prefix,
                athletes,
                inserted,
            } => info!(
                "Prefix '{}': {} athletes found, {} new rows",
                prefix, athletes, inserted
            ),
            ProgressEvent::StageCompleted { stage, inserted } => {
                info!("✓ {}: {} new rows", stage, inserted)
            }
        }
    }
}
