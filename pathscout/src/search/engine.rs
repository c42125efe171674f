use rayon::prelude::*;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use super::matcher::EntryMatcher;
use super::walker::BatchWalker;
use crate::config::SearchConfig;
use crate::errors::{unify_path, SearchError, SearchResult};
use crate::filters::should_ignore;
use crate::metrics::ScanMetrics;
use crate::results::SearchResults;

/// Cooperative cancellation handle shared between a caller and the
/// workers of one search.
///
/// Workers check the token before enumerating each directory; once
/// cancelled they stop descending and return whatever their local buffer
/// already holds, so a cancelled search yields a partial result set.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Performs a concurrent filename search under the configured root.
///
/// Blocks until every dispatched batch has completed and returns the
/// merged result set exactly once.
pub fn search(config: &SearchConfig) -> SearchResult<SearchResults> {
    search_with_cancel(config, &CancelToken::new())
}

/// Same as [`search`], observing the given cancellation token.
pub fn search_with_cancel(
    config: &SearchConfig,
    cancel: &CancelToken,
) -> SearchResult<SearchResults> {
    info!(
        "Starting search under {} (filename: {:?}, format: {:?})",
        config.root_path.display(),
        config.filename_pattern,
        config.format_pattern
    );

    // Patterns compile before the filesystem is touched, so a malformed
    // pattern can never surface mid-traversal.
    let metrics = Arc::new(ScanMetrics::new());
    let matcher = EntryMatcher::with_metrics(
        &config.filename_pattern,
        &config.format_pattern,
        metrics.clone(),
    )?;

    let root = validate_root(&config.root_path)?;
    let top_dirs = top_level_directories(&root, &config.ignore_patterns)?;
    debug!(
        "Partitioning {} top-level directories into batches of {}",
        top_dirs.len(),
        config.batch_size
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.max_workers.get())
        .thread_name(|i| format!("pathscout-{i}"))
        .build()?;

    let walker = BatchWalker::new(
        matcher,
        config.ignore_patterns.clone(),
        metrics.clone(),
        cancel.clone(),
    );

    let matches: Vec<PathBuf> = pool.install(|| {
        top_dirs
            .par_chunks(config.batch_size.get())
            .flat_map(|batch| walker.scan_batch(batch))
            .collect()
    });

    metrics.log_stats();
    let results = SearchResults::from_parts(matches, metrics.get_stats());
    info!(
        "Search complete. {} files matched across {} directories",
        results.len(),
        results.stats.directories_scanned
    );
    Ok(results)
}

/// Checks that the root exists and is a directory, and canonicalizes it
/// so every reported match is an absolute path
fn validate_root(root: &Path) -> SearchResult<PathBuf> {
    let metadata = fs::metadata(root).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SearchError::root_not_found(root),
        ErrorKind::PermissionDenied => SearchError::permission_denied(root),
        _ => SearchError::IoError(e),
    })?;
    if !metadata.is_dir() {
        return Err(SearchError::not_a_directory(root));
    }
    Ok(unify_path(root))
}

/// Lists the immediate subdirectories of the root, in directory order.
///
/// Only directories become batch work; entries directly under the root
/// that are not directories are never match candidates.
fn top_level_directories(root: &Path, ignore_patterns: &[String]) -> SearchResult<Vec<PathBuf>> {
    let read_dir = fs::read_dir(root).map_err(|e| match e.kind() {
        ErrorKind::PermissionDenied => SearchError::permission_denied(root),
        _ => SearchError::IoError(e),
    })?;

    let mut directories = Vec::new();
    for entry in read_dir.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_dir() {
            continue;
        }
        let path = entry.path();
        if should_ignore(&path, ignore_patterns) {
            debug!("Ignoring top-level directory {}", path.display());
            continue;
        }
        directories.push(path);
    }
    Ok(directories)
}
