//! OpenSearch CLI
//!
//! Compiles engine-agnostic search requests into OpenSearch query bodies and
//! runs them against a configured cluster.

mod logging;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use opensearch_client::{
    HealthChecker, OpenSearchClient, OpenSearchOptions, SearchProvider,
};
use opensearch_compiler::{FieldCatalog, RequestCompiler};
use search_model::SearchRequest;

#[derive(Parser)]
#[command(name = "opensearch-cli", version, about = "Compile and run searches against OpenSearch")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// Default log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the OpenSearch body compiled from a search request
    Compile {
        /// Search request JSON file
        #[arg(long)]
        request: PathBuf,
        /// Index mapping JSON file (`_mapping` response or properties object)
        #[arg(long)]
        mapping: Option<PathBuf>,
        #[arg(long)]
        index: String,
    },
    /// Run a search request and print the lifted response
    Search {
        #[arg(long)]
        request: PathBuf,
        #[arg(long)]
        index: String,
    },
    /// Check that the configured server is reachable
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    logging::init_logging(&cli.log_level, cli.json_logs).context("Failed to initialize logging")?;

    match cli.command {
        Command::Compile {
            request,
            mapping,
            index,
        } => {
            let request = read_request(&request)?;
            let fields = match mapping {
                Some(path) => read_catalog(&path)?,
                None => FieldCatalog::new(),
            };

            let query = RequestCompiler::default().compile(Some(&request), &index, &fields);
            println!("{}", serde_json::to_string_pretty(&query)?);
        }
        Command::Search { request, index } => {
            let request = read_request(&request)?;
            let client = connect()?;

            let fields = client
                .get_field_catalog(&index)
                .await
                .with_context(|| format!("Failed to read mapping of index '{index}'"))?;
            let response = SearchProvider::new(client)
                .search(&index, &request, &fields)
                .await
                .context("Search failed")?;

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Health => {
            let client = connect()?;
            let timeout = client.settings().health_check_timeout;

            let report = HealthChecker::new(client, timeout).check().await;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.is_healthy() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn connect() -> anyhow::Result<OpenSearchClient> {
    let options = OpenSearchOptions::load().context("Failed to load OpenSearch options")?;
    let client = OpenSearchClient::from_options(&options).context("Invalid connection settings")?;
    tracing::info!(server = %client.settings().server, "Using OpenSearch server");
    Ok(client)
}

fn read_request(path: &Path) -> anyhow::Result<SearchRequest> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse search request {}", path.display()))
}

fn read_catalog(path: &Path) -> anyhow::Result<FieldCatalog> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read mapping file {}", path.display()))?;
    let mapping: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse mapping {}", path.display()))?;
    FieldCatalog::from_mapping(&mapping).context("Invalid index mapping")
}
