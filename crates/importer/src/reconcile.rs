use futures::stream::{self, StreamExt, TryStreamExt};
use storage::models::AthleteRef;
use tracing::debug;

use crate::Result;
use crate::progress::{ProgressEvent, ProgressReporter};
use crate::sources::federation::ResultBundle;
use crate::traits::FederationSource;
use crate::upsert::ChunkedUpserter;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub athletes: usize,
    /// Sum of the result-array lengths returned for every athlete.
    pub results_fetched: usize,
    pub events_inserted: u64,
    pub event_types_inserted: u64,
    pub results_inserted: u64,
}

impl ReconcileSummary {
    pub fn inserted(&self) -> u64 {
        self.events_inserted + self.event_types_inserted + self.results_inserted
    }

    fn absorb(&mut self, athlete: ReconcileSummary) {
        self.athletes += athlete.athletes;
        self.results_fetched += athlete.results_fetched;
        self.events_inserted += athlete.events_inserted;
        self.event_types_inserted += athlete.event_types_inserted;
        self.results_inserted += athlete.results_inserted;
    }
}

/// Fetches each athlete's result history and spreads it over the events,
/// event types and results tables.
///
/// At most `concurrency` athletes are in flight at once. Their futures are
/// polled from the calling task; nothing is spawned. Duplicate events shared
/// by several athletes are absorbed by the store's insert-or-ignore.
pub struct ResultsReconciler<'a> {
    source: &'a dyn FederationSource,
    upserter: &'a ChunkedUpserter<'a>,
    reporter: &'a dyn ProgressReporter,
    concurrency: usize,
}

impl<'a> ResultsReconciler<'a> {
    pub fn new(
        source: &'a dyn FederationSource,
        upserter: &'a ChunkedUpserter<'a>,
        reporter: &'a dyn ProgressReporter,
        concurrency: usize,
    ) -> Self {
        Self {
            source,
            upserter,
            reporter,
            concurrency: concurrency.max(1),
        }
    }

    async fn reconcile_athlete(&self, athlete: &AthleteRef) -> Result<ReconcileSummary> {
        let name = athlete.display_name();
        debug!("Getting results for {}", name);

        let fetched = self.source.fetch_athlete_results(&athlete.live_id).await?;
        let results_fetched = fetched.results.len();
        debug!("Got {} results for {}", results_fetched, name);

        let bundle = ResultBundle::from_results(fetched.results);
        let events = self.upserter.upsert(&bundle.events).await?;
        let event_types = self.upserter.upsert(&bundle.event_types).await?;
        let results = self.upserter.upsert(&bundle.results).await?;
        debug!("Inserted {} results for {}", results.inserted, name);

        Ok(ReconcileSummary {
            athletes: 1,
            results_fetched,
            events_inserted: events.inserted,
            event_types_inserted: event_types.inserted,
            results_inserted: results.inserted,
        })
    }

    /// The first failing athlete aborts the whole run; in-flight athletes are
    /// dropped.
    pub async fn reconcile(&self, athletes: &[AthleteRef]) -> Result<ReconcileSummary> {
        let total = athletes.len();
        let mut summary = ReconcileSummary::default();

        let mut outcomes = stream::iter(athletes)
            .map(|athlete| self.reconcile_athlete(athlete))
            .buffer_unordered(self.concurrency);

        while let Some(athlete) = outcomes.try_next().await? {
            summary.absorb(athlete);
            self.reporter.report(ProgressEvent::AthleteReconciled {
                completed: summary.athletes,
                total,
                results: athlete.results_fetched,
            });
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ImporterError;
    use crate::sources::federation::{
        AccessToken, AthleteResults, RemoteAthlete, RemoteCategory, RemoteOrganization,
        SearchPartition,
    };
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use storage::{MemoryStore, RecordStore, SqlValue, Table};

    /// Serves canned result histories, answering later athletes first.
    struct CannedResults {
        by_live_id: HashMap<String, serde_json::Value>,
        in_flight: AtomicUsize,
        peak_in_flight: AtomicUsize,
    }

    impl CannedResults {
        fn new(entries: Vec<(&str, serde_json::Value)>) -> Self {
            Self {
                by_live_id: entries
                    .into_iter()
                    .map(|(id, value)| (id.to_string(), value))
                    .collect(),
                in_flight: AtomicUsize::new(0),
                peak_in_flight: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl FederationSource for CannedResults {
        async fn fetch_organizations(&self, _: &AccessToken) -> Result<Vec<RemoteOrganization>> {
            Ok(Vec::new())
        }

        async fn fetch_athletes(&self, _: &AccessToken) -> Result<Vec<RemoteAthlete>> {
            Ok(Vec::new())
        }

        async fn fetch_categories(&self, _: &AccessToken) -> Result<Vec<RemoteCategory>> {
            Ok(Vec::new())
        }

        async fn fetch_athlete_results(&self, live_id: &str) -> Result<AthleteResults> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

            let delay = 40u64.saturating_sub(live_id.len() as u64 * 5);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            let value = self.by_live_id.get(live_id).cloned().ok_or_else(|| {
                ImporterError::ConfigurationError(format!("no canned results for {}", live_id))
            })?;
            Ok(serde_json::from_value(value).unwrap())
        }

        async fn fetch_search_partition(&self, _: char) -> Result<SearchPartition> {
            Ok(SearchPartition::default())
        }
    }

    fn athlete(id: i64, live_id: &str) -> AthleteRef {
        AthleteRef {
            id,
            firstname: Some(format!("First{}", id)),
            lastname: Some(format!("Last{}", id)),
            live_id: live_id.to_string(),
        }
    }

    fn results(ids: &[i64], event_id: i64) -> serde_json::Value {
        let entries: Vec<_> = ids
            .iter()
            .map(|id| {
                json!({
                    "id": id,
                    "event": {"id": event_id, "name": format!("Meeting {}", event_id)},
                    "eventType": {"id": 1, "name_en": "60m"}
                })
            })
            .collect();
        json!({ "results": entries })
    }

    #[tokio::test]
    async fn test_results_count_is_exact_under_reordering() {
        let source = CannedResults::new(vec![
            ("a", results(&[1, 2, 3], 100)),
            ("bb", results(&[4], 100)),
            ("ccc", results(&[5, 6], 101)),
            ("dddd", json!({"results": []})),
            ("eeeee", results(&[7, 8, 9, 10], 102)),
        ]);
        let store = MemoryStore::new();
        let events = Mutex::new(Vec::new());
        let reporter = |event: ProgressEvent| events.lock().unwrap().push(event);
        let upserter = ChunkedUpserter::new(&store, &reporter, 1000);
        let reconciler = ResultsReconciler::new(&source, &upserter, &reporter, 3);

        let athletes = vec![
            athlete(1, "a"),
            athlete(2, "bb"),
            athlete(3, "ccc"),
            athlete(4, "dddd"),
            athlete(5, "eeeee"),
        ];
        let summary = reconciler.reconcile(&athletes).await.unwrap();

        assert_eq!(summary.athletes, 5);
        assert_eq!(summary.results_fetched, 10);
        assert_eq!(summary.results_inserted, 10);
        assert_eq!(summary.events_inserted, 3);
        assert_eq!(summary.event_types_inserted, 1);
        assert_eq!(store.count(Table::Results).await.unwrap(), 10);
        assert_eq!(store.count(Table::Events).await.unwrap(), 3);

        let completed: Vec<usize> = events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                ProgressEvent::AthleteReconciled { completed, .. } => Some(*completed),
                _ => None,
            })
            .collect();
        assert_eq!(completed, vec![1, 2, 3, 4, 5]);
        assert!(source.peak_in_flight.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_results_store_derived_foreign_keys() {
        let source = CannedResults::new(vec![(
            "live-1",
            json!({"results": [
                {"id": 1, "category": {"id": 12}, "event": {"id": 30}},
                {"id": 2, "round": {"name": "Heat 1"}}
            ]}),
        )]);
        let store = MemoryStore::new();
        let reporter = |_: ProgressEvent| {};
        let upserter = ChunkedUpserter::new(&store, &reporter, 1000);
        let reconciler = ResultsReconciler::new(&source, &upserter, &reporter, 4);

        reconciler.reconcile(&[athlete(1, "live-1")]).await.unwrap();

        let with_nested = store.get(Table::Results, 1).unwrap();
        assert_eq!(with_nested.get("category_id"), Some(&SqlValue::BigInt(12)));
        assert_eq!(with_nested.get("event_id"), Some(&SqlValue::BigInt(30)));

        let bare = store.get(Table::Results, 2).unwrap();
        assert!(!bare.is_set("category_id"));
        assert!(!bare.is_set("event_id"));
        assert_eq!(
            bare.get("round"),
            Some(&SqlValue::Opaque(json!({"name": "Heat 1"}).into()))
        );
    }

    #[tokio::test]
    async fn test_failing_athlete_aborts_reconciliation() {
        let source = CannedResults::new(vec![("a", results(&[1], 100))]);
        let store = MemoryStore::new();
        let reporter = |_: ProgressEvent| {};
        let upserter = ChunkedUpserter::new(&store, &reporter, 1000);
        let reconciler = ResultsReconciler::new(&source, &upserter, &reporter, 2);

        let outcome = reconciler
            .reconcile(&[athlete(1, "a"), athlete(2, "missing")])
            .await;

        assert!(outcome.is_err());
    }

    #[tokio::test]
    async fn test_rerun_inserts_nothing_new() {
        let source = CannedResults::new(vec![("a", results(&[1, 2], 100))]);
        let store = MemoryStore::new();
        let reporter = |_: ProgressEvent| {};
        let upserter = ChunkedUpserter::new(&store, &reporter, 1000);
        let reconciler = ResultsReconciler::new(&source, &upserter, &reporter, 2);

        let first = reconciler.reconcile(&[athlete(1, "a")]).await.unwrap();
        let second = reconciler.reconcile(&[athlete(1, "a")]).await.unwrap();

        assert_eq!(first.results_inserted, 2);
        assert_eq!(second.results_inserted, 0);
        assert_eq!(second.results_fetched, 2);
        assert_eq!(store.count(Table::Results).await.unwrap(), 2);
    }
}
