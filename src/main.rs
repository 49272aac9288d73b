//! Media-Spider main entry point
//!
//! This is the command-line interface for the Media-Spider crawler.

use anyhow::Context;
use clap::Parser;
use media_spider::config::{load_config_with_hash, Config};
use media_spider::crawler::crawl;
use media_spider::output::print_statistics;
use media_spider::ExtensionSet;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Media-Spider: a breadth-first media crawler
///
/// Media-Spider walks pages level by level from a set of seeds, follows the
/// links that pass its include/exclude filters, and downloads every linked or
/// embedded file with a tracked extension.
#[derive(Parser, Debug)]
#[command(name = "media-spider")]
#[command(version)]
#[command(about = "A breadth-first media crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG", default_value = "spider.toml")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let stats = crawl(&config).await.context("Crawl could not be started")?;
    print_statistics(&stats);

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("media_spider=info,warn"),
            1 => EnvFilter::new("media_spider=debug,info"),
            2 => EnvFilter::new("media_spider=trace,debug"),
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

/// Handles the --dry-run mode: shows the validated configuration
fn handle_dry_run(config: &Config) {
    println!("=== Media-Spider Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Page timeout: {}s", config.crawler.page_timeout_secs);
    println!("  Download timeout: {}s", config.crawler.download_timeout_secs);
    println!(
        "  Max concurrent downloads: {}",
        config.crawler.max_concurrent_downloads
    );

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);

    println!("\nFilters:");
    println!("  Include: {}", config.filter.include);
    match &config.filter.exclude {
        Some(exclude) => println!("  Exclude: {}", exclude),
        None => println!("  Exclude: (none)"),
    }

    let extensions = ExtensionSet::new(&config.extensions);
    println!("\nTracked Extensions ({}):", extensions.len());
    for extension in extensions.sorted() {
        println!("  - {}", extension);
    }

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);

    println!("\nSeeds ({}):", config.seeds.len());
    for seed in &config.seeds {
        println!("  * {}", seed);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start crawling with {} seed URLs",
        config.seeds.len()
    );
}
