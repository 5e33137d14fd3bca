use std::fmt;

use storage::RecordStore;
use storage::models::{Athlete, Category, Organization};
use tracing::{debug, info};

use crate::Result;
use crate::config::ImportOptions;
use crate::progress::{ProgressEvent, ProgressReporter};
use crate::reconcile::ResultsReconciler;
use crate::sources::federation::split_search_chunk;
use crate::traits::{FederationSource, TokenSource};
use crate::upsert::ChunkedUpserter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Organizations,
    Athletes,
    Categories,
    Results,
    SearchPartitions,
}

impl Stage {
    /// Stages run by `import seed`, in the order they must run. Results come
    /// last because they are driven by the athletes already stored.
    pub const SEED_ORDER: [Stage; 4] = [
        Stage::Organizations,
        Stage::Athletes,
        Stage::Categories,
        Stage::Results,
    ];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Organizations => "organizations",
            Self::Athletes => "athletes",
            Self::Categories => "categories",
            Self::Results => "results",
            Self::SearchPartitions => "search partitions",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub stages: Vec<(Stage, u64)>,
}

impl RunSummary {
    pub fn inserted(&self) -> u64 {
        self.stages.iter().map(|(_, inserted)| inserted).sum()
    }

    pub fn inserted_for(&self, stage: Stage) -> Option<u64> {
        self.stages
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, inserted)| *inserted)
    }
}

/// Runs import stages against a store. Every collaborator is borrowed from
/// the caller, so the same pipeline runs against PostgreSQL or a
/// `MemoryStore` with real or fake remote sources.
pub struct ImportPipeline<'a> {
    tokens: &'a dyn TokenSource,
    source: &'a dyn FederationSource,
    store: &'a dyn RecordStore,
    reporter: &'a dyn ProgressReporter,
    options: ImportOptions,
}

impl<'a> ImportPipeline<'a> {
    pub fn new(
        tokens: &'a dyn TokenSource,
        source: &'a dyn FederationSource,
        store: &'a dyn RecordStore,
        reporter: &'a dyn ProgressReporter,
        options: ImportOptions,
    ) -> Self {
        Self {
            tokens,
            source,
            store,
            reporter,
            options,
        }
    }

    fn upserter(&self) -> ChunkedUpserter<'_> {
        ChunkedUpserter::new(self.store, self.reporter, self.options.chunk_size)
    }

    /// Runs the requested stages sequentially, in their fixed order no matter
    /// how they were requested. The first failing stage aborts the run.
    pub async fn run(&self, stages: &[Stage]) -> Result<RunSummary> {
        self.options.validate()?;

        let mut ordered = stages.to_vec();
        ordered.sort();
        ordered.dedup();
        debug!("Running stages {:?} with {:?}", ordered, self.options);

        let mut summary = RunSummary::default();
        for stage in ordered {
            self.reporter.report(ProgressEvent::StageStarted { stage });
            let inserted = match stage {
                Stage::Organizations => self.import_organizations().await?,
                Stage::Athletes => self.import_athletes().await?,
                Stage::Categories => self.import_categories().await?,
                Stage::Results => self.import_results().await?,
                Stage::SearchPartitions => self.import_search_partitions().await?,
            };
            self.reporter
                .report(ProgressEvent::StageCompleted { stage, inserted });
            summary.stages.push((stage, inserted));
        }

        info!("Import finished: {} new rows", summary.inserted());
        Ok(summary)
    }

    pub async fn import_organizations(&self) -> Result<u64> {
        let token = self.tokens.get_token().await?;
        let fetched = self.source.fetch_organizations(&token).await?;
        self.reporter.report(ProgressEvent::Fetched {
            stage: Stage::Organizations,
            records: fetched.len(),
        });

        let organizations: Vec<Organization> = fetched.into_iter().map(Into::into).collect();
        Ok(self.upserter().upsert(&organizations).await?.inserted)
    }

    pub async fn import_athletes(&self) -> Result<u64> {
        let token = self.tokens.get_token().await?;
        let fetched = self.source.fetch_athletes(&token).await?;
        self.reporter.report(ProgressEvent::Fetched {
            stage: Stage::Athletes,
            records: fetched.len(),
        });

        let athletes: Vec<Athlete> = fetched.into_iter().map(Into::into).collect();
        Ok(self.upserter().upsert(&athletes).await?.inserted)
    }

    pub async fn import_categories(&self) -> Result<u64> {
        let token = self.tokens.get_token().await?;
        let fetched = self.source.fetch_categories(&token).await?;
        self.reporter.report(ProgressEvent::Fetched {
            stage: Stage::Categories,
            records: fetched.len(),
        });

        let categories: Vec<Category> = fetched.into_iter().map(Into::into).collect();
        Ok(self.upserter().upsert(&categories).await?.inserted)
    }

    pub async fn import_results(&self) -> Result<u64> {
        let athletes = self.store.list_athletes(self.options.results_limit).await?;
        self.reporter.report(ProgressEvent::Fetched {
            stage: Stage::Results,
            records: athletes.len(),
        });

        let upserter = self.upserter();
        let reconciler = ResultsReconciler::new(
            self.source,
            &upserter,
            self.reporter,
            self.options.concurrency,
        );
        let summary = reconciler.reconcile(&athletes).await?;
        info!(
            "Fetched {} results for {} athletes",
            summary.results_fetched, summary.athletes
        );

        Ok(summary.inserted())
    }

    /// Walks the public search host one letter at a time. Within a chunk of
    /// athletes the organizations they embed are written first.
    pub async fn import_search_partitions(&self) -> Result<u64> {
        let upserter = self.upserter();
        let mut inserted = 0;

        for prefix in self.options.prefixes.iter() {
            let partition = self.source.fetch_search_partition(prefix).await?;
            debug!(
                "Prefix '{}': {} athletes, {} events",
                prefix,
                partition.athletes.len(),
                partition.events.len()
            );

            let mut prefix_inserted = 0;
            for chunk in partition.athletes.chunks(upserter.chunk_size()) {
                let (organizations, athletes) = split_search_chunk(chunk);
                prefix_inserted += upserter.upsert(&organizations).await?.inserted;
                prefix_inserted += upserter.upsert(&athletes).await?.inserted;
            }

            self.reporter.report(ProgressEvent::PrefixCompleted {
                prefix,
                athletes: partition.athletes.len(),
                inserted: prefix_inserted,
            });
            inserted += prefix_inserted;
        }

        Ok(inserted)
    }
}
