//! # GVP CLI
//!
//! Loads vectors from a JSON document into an in-memory service, runs one
//! operation against it and prints the result as JSON.
//!
//! ```text
//! gvp --data vectors.json query --vector 1,0 --top-k 2
//! gvp --data vectors.json --config gvp.toml fetch --id A --namespace docs
//! gvp --data vectors.json stats
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use gvp_api::{QueryRequest, VectorService};
use gvp_core::config::{Config, LogFormat, LoggingConfig};
use gvp_core::{DistanceMetric, Vector};

#[derive(Parser)]
#[command(name = "gvp", version = gvp_core::VERSION)]
#[command(about = "Exact in-memory nearest-neighbor search over named vectors")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// JSON document of vectors to load before running the command
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `gvp_api=trace`; overrides the config
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank stored vectors against a query vector
    Query {
        /// Comma-separated components
        #[arg(long, value_delimiter = ',', required = true, allow_hyphen_values = true)]
        vector: Vec<f32>,
        #[arg(long, default_value_t = 10)]
        top_k: usize,
        /// cosine, cosine-distance, euclidean or dot-product
        #[arg(long)]
        metric: Option<DistanceMetric>,
        #[arg(long, default_value = "")]
        namespace: String,
        #[arg(long)]
        include_values: bool,
    },
    /// Print the stored values of one id
    Fetch {
        #[arg(long)]
        id: String,
        #[arg(long, default_value = "")]
        namespace: String,
    },
    /// Print vector counts and dimensions
    Stats,
}

#[derive(Debug, Deserialize)]
struct DataFile {
    vectors: Vec<DataVector>,
}

#[derive(Debug, Deserialize)]
struct DataVector {
    id: String,
    values: Vec<f32>,
    #[serde(default)]
    namespace: String,
}

#[derive(Serialize)]
struct FetchOutput<'a> {
    namespace: &'a str,
    id: &'a str,
    values: Vec<f32>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path).context("loading configuration"),
        None => Ok(Config::default()),
    };
    let logging = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    init_tracing(&logging, cli.log_level.as_deref());

    match config.and_then(|config| run(cli, config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(logging: &LoggingConfig, flag: Option<&str>) {
    let (filter, rejected) = build_filter(logging, flag);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match logging.format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }

    if let Some(reason) = rejected {
        warn!(%reason, "ignoring invalid log filter");
    }
}

/// Pick the log filter: `--log-level`, then `RUST_LOG`, then the config
/// level. A filter that fails to parse is skipped and its error returned.
fn build_filter(logging: &LoggingConfig, flag: Option<&str>) -> (EnvFilter, Option<String>) {
    let mut rejected = None;

    if let Some(directives) = flag {
        match EnvFilter::try_new(directives) {
            Ok(filter) => return (filter, None),
            Err(e) => rejected = Some(format!("--log-level {:?}: {}", directives, e)),
        }
    }
    if let Ok(directives) = std::env::var(EnvFilter::DEFAULT_ENV) {
        match EnvFilter::try_new(&directives) {
            Ok(filter) => return (filter, rejected),
            Err(e) => {
                rejected.get_or_insert_with(|| {
                    format!("{} {:?}: {}", EnvFilter::DEFAULT_ENV, directives, e)
                });
            }
        }
    }
    (EnvFilter::new(logging.level.as_str()), rejected)
}

fn run(cli: Cli, config: Config) -> Result<()> {
    let service = VectorService::new(config.index);
    if let Some(path) = &cli.data {
        load_data(&service, path)?;
    }

    match cli.command {
        Commands::Query {
            vector,
            top_k,
            metric,
            namespace,
            include_values,
        } => {
            let mut request = QueryRequest::new(vector, top_k).include_values(include_values);
            request.metric = metric;
            print_json(&service.query(&namespace, request)?)
        }
        Commands::Fetch { id, namespace } => {
            let values = service.fetch(&namespace, &id)?;
            print_json(&FetchOutput {
                namespace: &namespace,
                id: &id,
                values,
            })
        }
        Commands::Stats => print_json(&service.describe_index_stats()?),
    }
}

fn load_data(service: &VectorService, path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading data file {}", path.display()))?;
    let data: DataFile = serde_json::from_str(&text)
        .with_context(|| format!("parsing data file {}", path.display()))?;

    let mut batches: BTreeMap<String, Vec<Vector>> = BTreeMap::new();
    for entry in data.vectors {
        batches
            .entry(entry.namespace)
            .or_default()
            .push(Vector::new(entry.id, entry.values));
    }

    for (namespace, vectors) in batches {
        let response = service
            .upsert(&namespace, vectors)
            .with_context(|| format!("loading namespace {:?}", namespace))?;
        info!(namespace = %namespace, count = response.upserted_count, "loaded vectors");
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn report(err: &anyhow::Error) {
    match err.downcast_ref::<gvp_core::Error>() {
        Some(e) => {
            if !e.is_client_error() {
                error!(error = %format!("{:#}", err), "command failed");
            }
            eprintln!("error [{}]: {}", e.error_code(), e.public_message());
        }
        None => eprintln!("error: {:#}", err),
    }
}
