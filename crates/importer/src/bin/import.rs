use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use importer::config::{
    DEFAULT_CHUNK_SIZE, DEFAULT_CONCURRENCY, DEFAULT_RESULTS_LIMIT, DEFAULT_SEARCH_URL,
};
use importer::{
    FederationClient, ImportOptions, ImportPipeline, ImporterError, PrefixRange, RemoteConfig,
    Result, RunSummary, Stage, TokenProvider, TracingReporter,
};
use storage::database::{DEFAULT_MAX_CONNECTIONS, pool_size};
use storage::{Database, MemoryStore, RecordStore, Table};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "import")]
#[command(about = "Athletics federation data importer", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Import into an in-memory store and print the resulting row counts
    #[arg(long)]
    dry_run: bool,

    /// Apply the bundled migrations before importing
    #[arg(long)]
    migrate: bool,

    /// Rows per bulk insert
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    #[command(flatten)]
    remote: RemoteArgs,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Args)]
struct RemoteArgs {
    #[arg(long, env = "REMOTE_AUTH_URL")]
    auth_url: Option<String>,

    #[arg(long, env = "REMOTE_CLIENT_ID", default_value = "")]
    client_id: String,

    #[arg(long, env = "REMOTE_CLIENT_SECRET", default_value = "", hide_env_values = true)]
    client_secret: String,

    #[arg(long, env = "REMOTE_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "SEARCH_API_URL", default_value = DEFAULT_SEARCH_URL)]
    search_url: String,
}

impl RemoteArgs {
    fn config(&self, api_url: String) -> RemoteConfig {
        RemoteConfig {
            auth_url: self.auth_url.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            api_url,
            search_url: self.search_url.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Import organizations, athletes, categories and athlete results
    Seed {
        /// Stage to run; repeat to run several. Defaults to all of them.
        #[arg(long = "stage", value_enum)]
        stages: Vec<StageArg>,

        /// Number of stored athletes whose results are fetched
        #[arg(long, default_value_t = DEFAULT_RESULTS_LIMIT)]
        results_limit: i64,

        /// Athletes whose results are fetched at the same time
        #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
        concurrency: usize,
    },
    /// Import athletes and their clubs from the public search host
    Search {
        /// Inclusive letter range, e.g. `a-c`
        #[arg(long, default_value = "a-c")]
        prefixes: PrefixRange,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StageArg {
    Organizations,
    Athletes,
    Categories,
    Results,
}

impl From<StageArg> for Stage {
    fn from(stage: StageArg) -> Self {
        match stage {
            StageArg::Organizations => Stage::Organizations,
            StageArg::Athletes => Stage::Athletes,
            StageArg::Categories => Stage::Categories,
            StageArg::Results => Stage::Results,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "import={},importer={},storage={}",
                    log_level, log_level, log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Import failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let store = open_store(&cli).await?;

    let outcome = match execute(&cli, store.as_ref()).await {
        Ok(_) if cli.dry_run => print_counts(store.as_ref()).await,
        Ok(summary) => {
            info!("✓ Import completed successfully! ({} new rows)", summary.inserted());
            Ok(())
        }
        Err(e) => Err(e),
    };

    store.close().await;
    outcome
}

async fn open_store(cli: &Cli) -> Result<Box<dyn RecordStore>> {
    if cli.dry_run {
        if cli.migrate {
            warn!("--migrate has no effect with --dry-run");
        }
        info!("Dry run: importing into an in-memory store");
        return Ok(Box::new(MemoryStore::new()));
    }

    let database_url = cli.database_url.as_deref().ok_or_else(|| {
        ImporterError::ConfigurationError("DATABASE_URL is not defined".to_string())
    })?;

    let max_connections = match &cli.command {
        Commands::Seed { concurrency, .. } => pool_size(*concurrency),
        Commands::Search { .. } => DEFAULT_MAX_CONNECTIONS,
    };
    info!("Connecting to database ({} connections)...", max_connections);
    let database = Database::connect(database_url, max_connections).await?;

    if cli.migrate {
        info!("Applying migrations...");
        if let Err(e) = database.run_migrations().await {
            database.close().await;
            return Err(e.into());
        }
    }

    Ok(Box::new(database))
}

async fn execute(cli: &Cli, store: &dyn RecordStore) -> Result<RunSummary> {
    let (stages, options, config) = match &cli.command {
        Commands::Seed {
            stages,
            results_limit,
            concurrency,
        } => {
            let api_url = cli.remote.api_url.clone().ok_or_else(|| {
                ImporterError::ConfigurationError("REMOTE_API_URL is not defined".to_string())
            })?;
            let stages: Vec<Stage> = if stages.is_empty() {
                Stage::SEED_ORDER.to_vec()
            } else {
                stages.iter().copied().map(Stage::from).collect()
            };
            let options = ImportOptions {
                chunk_size: cli.chunk_size,
                results_limit: *results_limit,
                concurrency: *concurrency,
                ..Default::default()
            };
            (stages, options, cli.remote.config(api_url))
        }
        Commands::Search { prefixes } => {
            let options = ImportOptions {
                chunk_size: cli.chunk_size,
                prefixes: *prefixes,
                ..Default::default()
            };
            let api_url = cli.remote.api_url.clone().unwrap_or_default();
            (
                vec![Stage::SearchPartitions],
                options,
                cli.remote.config(api_url),
            )
        }
    };

    let client = FederationClient::http_client()?;
    let tokens = TokenProvider::new(client.clone(), config.clone());
    let source = FederationClient::new(client, config);

    ImportPipeline::new(&tokens, &source, store, &TracingReporter, options)
        .run(&stages)
        .await
}

async fn print_counts(store: &dyn RecordStore) -> Result<()> {
    println!("Rows in the in-memory store:");
    for table in Table::ALL {
        println!("  {:<12} {}", table.name(), store.count(table).await?);
    }
    Ok(())
}
