//! Gossamer main entry point
//!
//! Command-line front end for the Gossamer crawler library.

use anyhow::Context;
use clap::Parser;
use gossamer::config::load_settings;
use gossamer::frontier::SqliteStore;
use gossamer::{Crawler, Page};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Gossamer: a pattern-driven web crawler
///
/// Gossamer walks a site's link graph from a seed URL, deduplicating
/// and prioritizing links by configurable patterns, and prints each
/// crawled page. Use the library crate to attach real handlers.
#[derive(Parser, Debug)]
#[command(name = "gossamer")]
#[command(version)]
#[command(about = "A pattern-driven web crawler", long_about = None)]
struct Cli {
    /// Path to TOML settings file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Keep the frontier in a SQLite database at this path instead of
    /// in memory
    #[arg(long, value_name = "PATH")]
    frontier_db: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading settings from: {}", cli.config.display());
    let settings = load_settings(&cli.config)
        .with_context(|| format!("failed to load settings from {}", cli.config.display()))?;

    let mut crawler = Crawler::new(settings).default_handler(Arc::new(|page: &Page| {
        println!("{} {}", page.status, page.url);
    }));

    if let Some(path) = &cli.frontier_db {
        tracing::info!("Using on-disk frontier at {}", path.display());
        let store = SqliteStore::new(path)
            .with_context(|| format!("failed to open frontier db at {}", path.display()))?;
        crawler = crawler.with_store(Box::new(store));
    }

    let stats = crawler.run().await.context("crawl failed")?;

    tracing::info!(
        "Done: {} pages, {} failures, {} links",
        stats.pages_fetched(),
        stats.fetch_failures(),
        stats.links_enqueued()
    );

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gossamer=info,warn"),
            1 => EnvFilter::new("gossamer=debug,info"),
            2 => EnvFilter::new("gossamer=trace,debug"),
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
