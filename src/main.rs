use clap::{Args, Parser, Subcommand};
use loan_sim::application::batch::BatchOrchestrator;
use loan_sim::application::service::SimulationService;
use loan_sim::config::AppConfig;
use loan_sim::domain::ports::SimulationStoreRef;
use loan_sim::domain::pricing::PricingEngine;
use loan_sim::infrastructure::in_memory::InMemorySimulationStore;
use loan_sim::infrastructure::notifier::LogNotifier;
#[cfg(feature = "storage-rocksdb")]
use loan_sim::infrastructure::rocksdb::RocksDbSimulationStore;
use loan_sim::interfaces::csv::request_reader::SimulationRequestReader;
use loan_sim::interfaces::csv::result_writer::SimulationResultWriter;
use loan_sim::interfaces::http::{AppState, router};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the simulation HTTP API
    Serve {
        /// Listen address [default: 0.0.0.0]
        #[arg(long, env = "LOAN_SIM_HOST")]
        host: Option<String>,

        /// Listen port [default: 8080]
        #[arg(long, env = "LOAN_SIM_PORT")]
        port: Option<u16>,

        #[command(flatten)]
        common: CommonArgs,
    },
    /// Price every request of a CSV file and print the results
    Batch {
        /// Input CSV with columns principal,birth_date,term_months,rate_type
        input: PathBuf,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "LOAN_SIM_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Sender address [default: simulations@localhost]
    #[arg(long, env = "LOAN_SIM_MAIL_SENDER")]
    mail_sender: Option<String>,

    /// Recipient address [default: simulations@localhost]
    #[arg(long, env = "LOAN_SIM_MAIL_RECIPIENT")]
    mail_recipient: Option<String>,

    /// Maximum number of batch items processed at once [default: 64]
    #[arg(long, env = "LOAN_SIM_MAX_CONCURRENCY")]
    max_concurrency: Option<usize>,

    /// Timeout for a single notification, in milliseconds [default: 10000]
    #[arg(long, env = "LOAN_SIM_NOTIFY_TIMEOUT_MS")]
    notify_timeout_ms: Option<u64>,
}

impl CommonArgs {
    /// Overrides `config` with every flag that was given.
    fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(sender) = &self.mail_sender {
            config.mail.sender = sender.clone();
        }
        if let Some(recipient) = &self.mail_recipient {
            config.mail.recipient = recipient.clone();
        }
        if let Some(max_concurrency) = self.max_concurrency {
            config.batch.max_concurrency = max_concurrency;
        }
        if let Some(timeout_ms) = self.notify_timeout_ms {
            config.batch.notify_timeout = Duration::from_millis(timeout_ms);
        }
        config
    }
}

fn open_store(db_path: Option<&Path>) -> Result<SimulationStoreRef> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => Ok(Arc::new(
            RocksDbSimulationStore::open(path).into_diagnostic()?,
        )),
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            warn!(
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Arc::new(InMemorySimulationStore::new()))
        }
        None => Ok(Arc::new(InMemorySimulationStore::new())),
    }
}

fn build(config: &AppConfig, store: SimulationStoreRef) -> (SimulationService, BatchOrchestrator) {
    let service = SimulationService::new(
        PricingEngine::default(),
        store,
        Arc::new(LogNotifier::new(config.mail.clone())),
        config.batch.notify_timeout,
    );
    let batch = BatchOrchestrator::new(service.clone(), config.batch.max_concurrency);
    (service, batch)
}

async fn serve(config: AppConfig, store: SimulationStoreRef) -> Result<()> {
    let (service, batch) = build(&config, store);
    let app = router(AppState::new(service, batch));

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await.into_diagnostic()?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .into_diagnostic()
}

async fn run_file(input: &Path, config: AppConfig, store: SimulationStoreRef) -> Result<()> {
    let (_, batch) = build(&config, store);

    let file = File::open(input).into_diagnostic()?;
    let mut requests = Vec::new();
    for request in SimulationRequestReader::new(file).requests() {
        match request {
            Ok(request) => requests.push(request),
            Err(e) => warn!("Error reading request: {}", e),
        }
    }

    let outcome = batch.run_batch(requests).await.into_diagnostic()?;

    let stdout = io::stdout();
    let mut writer = SimulationResultWriter::new(stdout.lock());
    writer.write_results(&outcome.results).into_diagnostic()?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { host, port, common } => {
            let mut config = common.apply(AppConfig::default());
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let store = open_store(common.db_path.as_deref())?;
            serve(config, store).await
        }
        Command::Batch { input, common } => {
            let store = open_store(common.db_path.as_deref())?;
            run_file(&input, common.apply(AppConfig::default()), store).await
        }
    }
}
