use anyhow::{bail, Context, Result};
use clap::Parser;
use scholar_harvest::config::{find_config_file, load_config, Config};
use scholar_harvest::enrich::Enricher;
use scholar_harvest::sources::ScholarSource;
use scholar_harvest::utils::HttpClient;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Scholar Harvest - search academic literature and enrich the hits
#[derive(Parser, Debug)]
#[command(name = "scholar-harvest")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "hongkongkiwi")]
#[command(about = "Search an academic search engine and enrich each hit with an abstract and methods section", long_about = None)]
struct Cli {
    /// Search query (prompted for interactively when omitted)
    query: Vec<String>,

    /// Enable verbose logging (can be used multiple times: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of results
    #[arg(long, short)]
    max_results: Option<usize>,

    /// Results file (default: scholar_results_<query>.json)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Directory for downloaded PDFs
    #[arg(long)]
    download_dir: Option<PathBuf>,

    /// Courtesy delay between enriched records, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Skip enrichment and emit the bare search results
    #[arg(long)]
    search_only: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("scholar_harvest={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from file if specified or found in default locations
    let mut config = if let Some(path) = &cli.config {
        load_config(path)?
    } else if let Some(path) = find_config_file() {
        tracing::info!("Using config file: {}", path.display());
        load_config(&path)?
    } else {
        Config::default()
    };
    apply_cli_overrides(&mut config, &cli);

    // The query is the only fatal input: everything later degrades instead
    let query = read_query(&cli.query)?;

    let client = HttpClient::new(&config.http);
    let source = ScholarSource::new(client.clone(), config.search.clone());

    tracing::info!("Searching for: {}", query);
    let mut records = source.search(&query, config.search.num_results).await;
    if records.is_empty() {
        bail!("no results found for query: {}", query);
    }
    tracing::info!("Found {} result(s)", records.len());

    if !cli.search_only {
        let enricher = Enricher::new(client, config.enrich.clone(), config.downloads.clone())
            .context("invalid section patterns in configuration")?;
        enricher.enrich_all(&mut records).await;
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&query));
    let json = serde_json::to_string_pretty(&records)?;
    std::fs::write(&output, json)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!("Saved {} record(s) to {}", records.len(), output.display());
    Ok(())
}

fn apply_cli_overrides(config: &mut Config, cli: &Cli) {
    if let Some(max_results) = cli.max_results {
        config.search.num_results = max_results;
    }
    if let Some(dir) = &cli.download_dir {
        config.downloads.dir = dir.clone();
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.enrich.courtesy_delay_ms = delay_ms;
    }
    if let Some(timeout) = cli.timeout {
        config.http.timeout_secs = timeout;
    }
}

/// Take the query from argv, falling back to an interactive prompt. An empty
/// query is fatal before any network activity.
fn read_query(args: &[String]) -> Result<String> {
    let raw = if args.is_empty() {
        print!("Enter search query: ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;
        line
    } else {
        args.join(" ")
    };

    let query = raw.trim().to_string();
    if query.is_empty() {
        bail!("search query must not be empty");
    }
    Ok(query)
}

fn default_output_path(query: &str) -> PathBuf {
    let slug: String = query.replace(' ', "_").chars().take(50).collect();
    PathBuf::from(format!("scholar_results_{}.json", slug))
}
