pub mod config;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod reconcile;
pub mod sources;
pub mod traits;
pub mod upsert;

pub use config::{ImportOptions, PrefixRange, RemoteConfig};
pub use error::{ImporterError, Result};
pub use pipeline::{ImportPipeline, RunSummary, Stage};
pub use progress::{ProgressEvent, ProgressReporter, TracingReporter};
pub use reconcile::{ReconcileSummary, ResultsReconciler};
pub use traits::{FederationSource, TokenSource};
pub use upsert::{ChunkedUpserter, UpsertSummary};

// Re-export the federation API client
pub use sources::federation::{AccessToken, FederationClient, TokenProvider};
