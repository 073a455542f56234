//! Document Indexer Main Entry Point
//!
//! Loads JSON documents from a file or stdin and bulk indexes them into
//! OpenSearch or Elasticsearch. The run summary is printed to stdout; logs go
//! to stderr.

use std::env;
use std::path::PathBuf;

use clap::Parser;
use doc_indexer::{Dependencies, IndexingError, Orchestrator};
use doc_indexer_shared::IndexingOpts;
use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Bulk index JSON documents, writing each distinct document once.
#[derive(Parser, Debug)]
#[command(name = "doc-indexer", version, about)]
struct Cli {
    /// Input file: a JSON array, a single JSON document or NDJSON. Use `-` for stdin.
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Metric name attached to the run's logs.
    #[arg(long, env = "INDEXER_METRIC_NAME", default_value = "")]
    metric_name: String,

    /// Job name attached to the run's logs.
    #[arg(long, env = "INDEXER_JOB_NAME", default_value = "")]
    job_name: String,
}

/// Initialize tracing/logging.
///
/// `LOG_FORMAT=json` selects structured JSON output, anything else the
/// pretty console format.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("doc_indexer=info,doc_indexer_repository=info"));

    let json = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    info!(
        service_name = "doc-indexer",
        service_version = env!("CARGO_PKG_VERSION"),
        json,
        "Tracing initialized"
    );
}

#[tokio::main]
async fn main() -> Result<(), IndexingError> {
    // Load environment variables from .env file
    dotenv().ok();

    let cli = Cli::parse();

    init_tracing();

    info!(input = %cli.input.display(), "Starting document indexer");

    let deps = match Dependencies::new().await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let opts = IndexingOpts::new(cli.metric_name, cli.job_name);
    let orchestrator = Orchestrator::new(deps.service, cli.input, opts);

    match orchestrator.run().await {
        Ok(report) => {
            println!("{}", report);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Document indexer failed");
            Err(e)
        }
    }
}
