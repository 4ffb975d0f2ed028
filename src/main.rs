//! Provider-Harvest main entry point
//!
//! This is the command-line interface for the provider directory crawler and
//! loader.

use anyhow::Context;
use clap::{Parser, Subcommand};
use provider_harvest::config::{load_config_with_hash, Config, CrawlMode};
use provider_harvest::crawler::{crawl, DepartmentEnumerator};
use provider_harvest::loader::run_load;
use provider_harvest::output::{load_statistics, print_report, print_statistics};
use provider_harvest::storage::open_storage;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Provider-Harvest: a healthcare directory crawler and loader
///
/// Crawls provider listings and detail pages into an intermediate JSON file,
/// then loads that file into a providers table.
#[derive(Parser, Debug)]
#[command(name = "provider-harvest")]
#[command(version)]
#[command(about = "Harvest provider listings and load them into a database", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the directory and write the intermediate JSON file
    Crawl,

    /// Load an intermediate JSON file into the database
    Load {
        /// File to load instead of the configured output path
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// Show statistics from the database and exit
    Stats,

    /// Validate config and show what would be crawled without crawling
    DryRun,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    match cli.command {
        Command::Crawl => handle_crawl(config, config_hash).await,
        Command::Load { input } => handle_load(&config, input.as_deref()),
        Command::Stats => handle_stats(&config),
        Command::DryRun => handle_dry_run(&config),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("provider_harvest=info,warn"),
            1 => EnvFilter::new("provider_harvest=debug,info"),
            2 => EnvFilter::new("provider_harvest=trace,debug"),
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

async fn handle_crawl(config: Config, config_hash: String) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling {} with {} concurrent requests",
        config.site.base_url,
        config.crawler.max_concurrent_requests
    );

    match crawl(config, config_hash).await {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

fn handle_load(config: &Config, input: Option<&Path>) -> anyhow::Result<()> {
    match run_load(config, input) {
        Ok(summary) => {
            println!(
                "{} records inserted successfully ({} skipped of {} entries)",
                summary.inserted, summary.skipped, summary.entries
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Load failed: {}", e);
            Err(e.into())
        }
    }
}

fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.database.path);

    let storage = open_storage(Path::new(&config.database.path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Provider-Harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Mode: {:?}", config.crawler.mode);
    println!(
        "  Max concurrent requests: {}",
        config.crawler.max_concurrent_requests
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Page size: {}", config.crawler.page_size);
    match config.crawler.max_results {
        Some(limit) => println!("  Max results per keyword: {}", limit),
        None => println!("  Max results per keyword: until first empty page"),
    }

    println!("\nSite:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Search path: {}", config.site.search_path);
    println!("  Search type: {}", config.site.search_type);
    println!("  User agent: {}", config.site.user_agent);

    match config.crawler.mode {
        CrawlMode::Flat => {
            println!("\nKeyword: {}", config.site.keyword);
        }
        CrawlMode::Departments if config.departments.keywords.is_empty() => {
            println!("\nDepartments: discovered from {}", config.departments.nav_path);
            println!("  Selector: {}", config.departments.nav_selector);
            println!("  Excluded labels: {}", config.departments.exclude.join(", "));
        }
        CrawlMode::Departments => {
            let enumerator = DepartmentEnumerator::from_config(&config.departments)?;
            let keywords = enumerator.normalize(&config.departments.keywords);
            println!("\nDepartments ({}):", keywords.len());
            for keyword in &keywords {
                println!("  - {}", keyword);
            }
        }
    }

    println!("\nOutput:");
    println!("  JSON file: {}", config.output.json_path);
    println!("  Database: {}", config.database.path);
    println!("  Commit policy: {:?}", config.database.commit);

    println!("\n✓ Configuration is valid");

    Ok(())
}
