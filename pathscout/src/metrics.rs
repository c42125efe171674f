use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

/// Tracks traversal and pattern-cache counters for one search.
///
/// Cloning shares the underlying counters, so the engine, the matcher,
/// and every worker record into the same instance.
#[derive(Debug, Clone, Default)]
pub struct ScanMetrics {
    // Traversal counters
    directories_scanned: Arc<AtomicU64>,
    directories_skipped: Arc<AtomicU64>,
    files_seen: Arc<AtomicU64>,
    files_matched: Arc<AtomicU64>,

    // Compiled-pattern cache counters
    cache_hits: Arc<AtomicU64>,
    cache_misses: Arc<AtomicU64>,
}

impl ScanMetrics {
    /// Creates a new ScanMetrics instance with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a directory whose entries were enumerated
    pub fn record_dir_scanned(&self) {
        self.directories_scanned.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a directory that could not be read and was treated as empty
    pub fn record_dir_skipped(&self) {
        self.directories_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a regular file that was evaluated against the patterns
    pub fn record_file_seen(&self) {
        self.files_seen.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a file that satisfied both patterns
    pub fn record_file_matched(&self) {
        self.files_matched.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a pattern-cache lookup
    pub fn record_cache_lookup(&self, hit: bool) {
        if hit {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.cache_misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> u64 {
        self.cache_misses.load(Ordering::Relaxed)
    }

    /// Gets a point-in-time snapshot of all counters
    pub fn get_stats(&self) -> ScanStats {
        ScanStats {
            directories_scanned: self.directories_scanned.load(Ordering::Relaxed),
            directories_skipped: self.directories_skipped.load(Ordering::Relaxed),
            files_seen: self.files_seen.load(Ordering::Relaxed),
            files_matched: self.files_matched.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
        }
    }

    /// Logs the current counters
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Scan stats: {} directories scanned, {} skipped, {} files seen, {} matched, pattern cache hits/misses: {}/{}",
            stats.directories_scanned,
            stats.directories_skipped,
            stats.files_seen,
            stats.files_matched,
            stats.cache_hits,
            stats.cache_misses
        );
    }
}

/// Snapshot of the counters collected during a scan
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanStats {
    pub directories_scanned: u64,
    pub directories_skipped: u64,
    pub files_seen: u64,
    pub files_matched: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
}
