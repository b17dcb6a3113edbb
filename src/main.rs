//! flower-images main entry point
//!
//! This is the command-line interface for the scheduled image harvester.

use clap::Parser;
use flower_images::config::{load_config, Config};
use flower_images::harvest::{build_http_client, dry_run, run_with_config};
use flower_images::output::{load_statistics, print_statistics};
use flower_images::storage::{ImageFiles, SqliteStorage};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Number of records listed by --stats
const STATS_LATEST_LIMIT: usize = 10;

/// flower-images: saves random new images from a storefront page
///
/// Each run downloads at most three images from the configured page that
/// have not been saved before and records them in the database. Meant to be
/// invoked by a scheduler; the exit status is success even when the run
/// reports an error.
#[derive(Parser, Debug)]
#[command(name = "flower-images")]
#[command(version)]
#[command(about = "Saves random new storefront images")]
#[command(long_about = "Saves random new storefront images.

Each run downloads at most three images from the configured page that have \
not been saved before and records them in the database. The exit status is \
success even when the run reports an error; a configuration file that cannot \
be loaded exits non-zero before any run starts.")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(
        short,
        long,
        value_name = "CONFIG",
        env = "FLOWER_IMAGES_CONFIG",
        default_value = "flower-images.toml"
    )]
    config: PathBuf,

    /// Base storage directory; overrides `default-storage` from the config
    #[arg(long, value_name = "DIR", env = "DEFAULT_STORAGE")]
    default_storage: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show the candidates a run would consider without downloading anything
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let mut config = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if let Some(dir) = cli.default_storage {
        config.override_default_storage(dir)?;
    }

    if cli.dry_run {
        handle_dry_run(&config).await?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_run(&config).await;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("flower_images=info,warn"),
            1 => EnvFilter::new("flower_images=debug,info"),
            2 => EnvFilter::new("flower_images=trace,debug"),
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

/// Handles the default mode: one harvest run, always exiting successfully
async fn handle_run(config: &Config) {
    let report = run_with_config(config).await;
    println!("✓ {}", report);
}

/// Handles the --dry-run mode: lists candidates and their recorded status
async fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== flower-images Dry Run ===\n");

    println!("Source:");
    println!("  Page: {}", config.source.page_url);
    println!("  Image link pattern: {}", config.source.image_link_pattern);

    println!("\nStorage:");
    println!("  Database: {}", config.storage.database_path);
    println!(
        "  Images: {}",
        ImageFiles::new(&config.storage.default_storage)
            .images_dir()
            .display()
    );

    let storage = SqliteStorage::new(Path::new(&config.storage.database_path))?;
    let client = build_http_client(&config.client)?;
    let report = dry_run(config, &storage, &client).await?;

    println!(
        "\nCandidates ({} of {} images on the page):",
        report.candidates.len(),
        report.image_count
    );
    for candidate in &report.candidates {
        let marker = if candidate.already_saved { "saved" } else { "new" };
        println!("  [{}] {}", marker, candidate.link);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ A run would save {} of {} new images",
        report.would_save(),
        report.new_links().len()
    );

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.storage.database_path);

    let storage = SqliteStorage::new(Path::new(&config.storage.database_path))?;
    let files = ImageFiles::new(&config.storage.default_storage);

    let stats = load_statistics(&storage, &files, STATS_LATEST_LIMIT)?;
    print_statistics(&stats);

    Ok(())
}
