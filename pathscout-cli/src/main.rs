use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use itertools::Itertools;
use pathscout::{search, SearchConfig, SearchResults};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Concurrent filename search", long_about = None)]
struct Cli {
    /// Pattern matched anywhere in the file name
    #[arg(short = 'p', long = "pattern", default_value = "")]
    pattern: String,

    /// Pattern matched against the start of the file name (e.g. '.*\.md$')
    #[arg(short = 'f', long = "format", default_value = "")]
    format: String,

    /// Root directory to search in
    #[arg(short = 'd', long, default_value = ".")]
    root: PathBuf,

    /// Paths to exclude (glob format, can be repeated)
    #[arg(short, long)]
    ignore: Vec<String>,

    /// Number of worker threads (0 selects one per CPU core)
    #[arg(short = 'j', long)]
    workers: Option<usize>,

    /// Number of top-level directories handed to one worker at a time
    #[arg(short = 'b', long)]
    batch_size: Option<NonZeroUsize>,

    /// Configuration file to load before applying CLI flags
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print matches as a JSON array instead of one path per line
    #[arg(long)]
    json: bool,

    /// Show only the summary, not individual matches
    #[arg(short, long)]
    stats: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let file_config = SearchConfig::load_from(cli.config.as_deref())
        .context("Failed to load configuration")?;
    let config = file_config.merge_with_cli(cli_overrides(&cli)?);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_level))
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(
        "Searching {} with {} workers, batch size {}",
        config.root_path.display(),
        config.max_workers,
        config.batch_size
    );

    let started = Instant::now();
    let results = search(&config)?;
    let elapsed = started.elapsed();

    if cli.json {
        print_json(&results)?;
    } else {
        print_human(&results, elapsed, cli.stats);
    }
    Ok(())
}

/// Builds a SearchConfig holding only the values the caller set on the
/// command line; defaults pass through so the config file wins for them
fn cli_overrides(cli: &Cli) -> Result<SearchConfig> {
    let max_workers = match cli.workers {
        Some(0) => NonZeroUsize::new(num_cpus::get().max(1)).unwrap(),
        Some(n) => NonZeroUsize::new(n).context("worker count must be positive")?,
        None => SearchConfig::default().max_workers,
    };

    Ok(SearchConfig {
        root_path: cli.root.clone(),
        filename_pattern: cli.pattern.clone(),
        format_pattern: cli.format.clone(),
        ignore_patterns: cli.ignore.clone(),
        max_workers,
        batch_size: cli.batch_size.unwrap_or(SearchConfig::default().batch_size),
        log_level: cli.log_level.clone(),
    })
}

fn print_json(results: &SearchResults) -> Result<()> {
    let paths = results.matches.iter().sorted().collect::<Vec<_>>();
    println!("{}", serde_json::to_string_pretty(&paths)?);
    Ok(())
}

fn print_human(results: &SearchResults, elapsed: Duration, stats_only: bool) {
    if !stats_only {
        for path in results.matches.iter().sorted() {
            println!("{}", path.display());
        }
    }

    let elapsed = Duration::from_millis(elapsed.as_millis() as u64);
    println!(
        "{} {} ({} directories scanned, {} skipped) in {}",
        results.len().to_string().green().bold(),
        if results.len() == 1 {
            "file matched"
        } else {
            "files matched"
        },
        results.stats.directories_scanned,
        results.stats.directories_skipped,
        humantime::format_duration(elapsed)
    );
}
