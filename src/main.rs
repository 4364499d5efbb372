//! Email-Harvest main entry point
//!
//! This is the command-line interface for the Email-Harvest contact collector.

use anyhow::Context;
use clap::Parser;
use email_harvest::collector::ResultCollector;
use email_harvest::config::{load_config_with_hash, validate, Config};
use email_harvest::output::{print_summary, write_report, CsvSink, OutputSink};
use email_harvest::prompt;
use email_harvest::search::{FixedSearch, SearchQuery};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Query label used when collecting from explicit URLs only
const EXPLICIT_URLS_QUERY: &str = "(explicit URLs)";

/// Email-Harvest: a polite contact-address collector
///
/// Email-Harvest searches the web for a query, visits the result pages one
/// at a time with per-domain delays and page budgets, and writes every
/// email address it finds to a CSV file.
///
/// Run without a query to be prompted for the settings.
#[derive(Parser, Debug)]
#[command(name = "email-harvest")]
#[command(version)]
#[command(about = "A polite contact-address collector", long_about = None)]
struct Cli {
    /// Search query
    #[arg(value_name = "QUERY")]
    query: Option<String>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of search results to process
    #[arg(short = 'r', long = "results", value_name = "N")]
    results: Option<usize>,

    /// Output CSV file
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// Delay range between requests to the same domain, in seconds
    #[arg(short, long, num_args = 2, value_names = ["MIN", "MAX"])]
    delay: Option<Vec<f64>>,

    /// Maximum pages fetched per domain
    #[arg(short, long, value_name = "N")]
    max_pages: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(short, long, value_name = "SECS")]
    timeout: Option<f64>,

    /// Collect from this URL instead of searching (repeatable)
    #[arg(long = "url", value_name = "URL")]
    urls: Vec<String>,

    /// Record each address only once, for the first URL it was found on
    #[arg(long)]
    dedup_across_urls: bool,

    /// Skip pages disallowed by robots.txt
    #[arg(long)]
    respect_robots: bool,

    /// Validate config and show the effective settings without any network activity
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Applies command-line overrides on top of file or default values
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(n) = self.results {
            config.collector.result_count = n;
        } else if !self.urls.is_empty() {
            config.collector.result_count = self.urls.len();
        }
        if let Some(output) = &self.output {
            config.output.csv_path = output.clone();
        }
        if let Some([min, max]) = self.delay.as_deref() {
            config.collector.min_delay = *min;
            config.collector.max_delay = *max;
        }
        if let Some(n) = self.max_pages {
            config.collector.max_pages_per_domain = n;
        }
        if let Some(secs) = self.timeout {
            config.collector.fetch_timeout = secs;
        }
        if self.dedup_across_urls {
            config.collector.dedup_across_urls = true;
        }
        if self.respect_robots {
            config.collector.respect_robots = true;
        }
    }

    fn is_interactive(&self) -> bool {
        self.query.is_none() && self.urls.is_empty() && !self.dry_run
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!(hash = %hash, "Configuration loaded successfully");
            config
        }
        None => Config::default(),
    };
    cli.apply_overrides(&mut config);

    let query = if cli.is_interactive() {
        match run_prompts(&mut config)? {
            Some(query) => Some(query),
            None => {
                println!("Operation cancelled.");
                return Ok(());
            }
        }
    } else {
        cli.query
            .as_deref()
            .map(SearchQuery::new)
            .transpose()
            .context("Invalid search query")?
    };

    validate(&config).context("Invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config, query.as_ref(), &cli.urls);
        return Ok(());
    }

    let query = match query {
        Some(query) => query,
        None => SearchQuery::new(EXPLICIT_URLS_QUERY)?,
    };

    handle_collect(config, query, cli.urls).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("email_harvest=info,warn"),
            1 => EnvFilter::new("email_harvest=debug,info"),
            2 => EnvFilter::new("email_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Asks for the run settings on the terminal
///
/// Returns `None` when the operator declines or input ends.
fn run_prompts(config: &mut Config) -> anyhow::Result<Option<SearchQuery>> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();

    println!("{}", "=".repeat(50));
    println!("EMAIL COLLECTOR - INTERACTIVE MODE");
    println!("{}", "=".repeat(50));
    println!("This tool collects email addresses from web search results.");
    println!("Please use it responsibly and respect website terms of service.\n");

    let Some(settings) = prompt::prompt_settings(&mut input, &mut out)? else {
        return Ok(None);
    };
    settings.apply(config);
    settings.describe(&mut out)?;

    if !prompt::confirm(&mut input, &mut out, "Start email collection? (y/n): ")? {
        return Ok(None);
    }
    out.flush()?;

    Ok(Some(settings.query))
}

/// Handles the --dry-run mode: shows the effective settings
fn handle_dry_run(config: &Config, query: Option<&SearchQuery>, urls: &[String]) {
    println!("=== Email-Harvest Dry Run ===\n");

    println!("Collector Configuration:");
    println!("  Results to process: {}", config.collector.result_count);
    println!(
        "  Delay: {}-{} seconds",
        config.collector.min_delay, config.collector.max_delay
    );
    println!(
        "  Max pages per domain: {}",
        config.collector.max_pages_per_domain
    );
    println!("  Fetch timeout: {}s", config.collector.fetch_timeout);
    println!(
        "  Dedup across URLs: {}",
        config.collector.dedup_across_urls
    );
    println!("  Respect robots.txt: {}", config.collector.respect_robots);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.user_agent_string());

    println!("\nSearch:");
    println!("  Endpoint: {}", config.search.endpoint);
    match query {
        Some(query) => println!("  Query: {}", query),
        None => println!("  Query: (none)"),
    }

    if !urls.is_empty() {
        println!("\nExplicit URLs ({}):", urls.len());
        for url in urls {
            println!("  - {}", url);
        }
    }

    println!("\nOutput:");
    println!("  CSV: {}", config.output.csv_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the collection run and writes its output
async fn handle_collect(config: Config, query: SearchQuery, urls: Vec<String>) -> anyhow::Result<()> {
    let collector = if urls.is_empty() {
        ResultCollector::with_duckduckgo(&config)?
    } else {
        tracing::info!(urls = urls.len(), "Collecting from explicit URLs");
        ResultCollector::new(&config, Box::new(FixedSearch::new(urls)))?
    };

    let token = collector.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping collection");
            token.cancel();
        }
    });

    println!("\nStarting email collection...");
    let report = collector.collect(&query).await;

    if report.was_interrupted() {
        println!("\nOperation cancelled by user. Keeping partial results.");
    }

    let mut sink = CsvSink::new(&config.output.csv_path);
    let written = write_report(&report, &mut sink)
        .with_context(|| format!("Failed to write results to {}", sink.destination()))?;

    if written {
        print_summary(&report);
        println!("\nResults have been saved to: {}", sink.destination());
    } else {
        println!("No emails found.");
    }

    Ok(())
}
