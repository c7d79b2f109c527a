// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Taxon - hybrid keyword and zero-shot article categorizer.
//!
//! This is the binary entry point. Every subcommand loads and validates the
//! configuration first; nothing is categorized until it validates.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod classify;
mod import;
mod labels;
mod model;
mod run;
mod stats;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Taxon - hybrid keyword and zero-shot article categorizer.
#[derive(Parser, Debug)]
#[command(name = "taxon", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, short = 'c', global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Categorize stored articles and write the decisions back.
    Run(RunArgs),
    /// Categorize a single document given on the command line.
    Classify(ClassifyArgs),
    /// Show the compiled label taxonomy.
    Labels,
    /// Download the zero-shot model files if they are missing.
    FetchModel {
        /// Also load the model to check that it runs.
        #[arg(long)]
        verify: bool,
    },
    /// Import articles from a JSON Lines file (one article per line).
    Import {
        /// Path to the `.jsonl` file.
        path: PathBuf,
    },
    /// Show how many articles carry each category.
    Stats {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Recategorize every article, not only uncategorized ones.
    #[arg(long)]
    all: bool,
    /// Rows fetched per store round-trip (overrides `batch.batch_size`).
    #[arg(long, value_name = "N")]
    batch_size: Option<usize>,
    /// Documents categorized concurrently (overrides `batch.concurrency`).
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,
    /// Compute decisions without writing them.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args, Debug)]
struct ClassifyArgs {
    /// Article title.
    #[arg(long)]
    title: String,
    /// Article summary.
    #[arg(long, default_value = "")]
    summary: String,
    /// Article body text.
    #[arg(long, default_value = "")]
    content: String,
    /// Skip the zero-shot classifier and use keyword rules only.
    #[arg(long)]
    keywords_only: bool,
    /// Output as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let config = match taxon_config::load_and_validate(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            taxon_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.app.log_level);

    let result = match cli.command {
        Commands::Run(args) => run::run_categorize(&config, args).await,
        Commands::Classify(args) => classify::run_classify(&config, args).await,
        Commands::Labels => labels::run_labels(&config),
        Commands::FetchModel { verify } => model::run_fetch_model(&config, verify).await,
        Commands::Import { path } => import::run_import(&config, &path).await,
        Commands::Stats { json } => stats::run_stats(&config, json).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Initialize the tracing subscriber.
///
/// Logs go to stderr so that command output on stdout stays machine-readable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("taxon={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Verify jemalloc is the global allocator by advancing the epoch.
        // Only jemalloc supports this -- the system allocator would fail.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report allocated bytes");
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_flags_parse() {
        let cli = Cli::try_parse_from([
            "taxon",
            "--config",
            "/tmp/taxon.toml",
            "run",
            "--all",
            "--batch-size",
            "25",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/taxon.toml")));
        match cli.command {
            Commands::Run(args) => {
                assert!(args.all);
                assert!(args.dry_run);
                assert_eq!(args.batch_size, Some(25));
                assert_eq!(args.concurrency, None);
            }
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn classify_requires_title() {
        assert!(Cli::try_parse_from(["taxon", "classify", "--summary", "x"]).is_err());
        let cli = Cli::try_parse_from(["taxon", "classify", "--title", "Airflow 3"]).unwrap();
        match cli.command {
            Commands::Classify(args) => {
                assert_eq!(args.title, "Airflow 3");
                assert_eq!(args.summary, "");
                assert!(!args.keywords_only);
            }
            other => panic!("expected classify, got {other:?}"),
        }
    }

    #[test]
    fn default_config_loads_for_binary() {
        let config = taxon_config::TaxonConfig::default();
        assert_eq!(config.app.log_level, "info");
        assert!(config.batch.only_uncategorized);
    }
}
