use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::metrics::ScanStats;

/// Aggregate outcome of one search call.
///
/// `matches` carries the absolute paths of every file that satisfied both
/// patterns. The collection is a union of per-worker buffers, so no
/// ordering is guaranteed across runs; callers needing stable output
/// should sort.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    /// Matched file paths, in no particular order
    pub matches: Vec<PathBuf>,
    /// Traversal counters collected during the scan
    pub stats: ScanStats,
}

impl SearchResults {
    /// Creates a new empty result set
    pub fn new() -> Self {
        Default::default()
    }

    /// Builds a result set from collected matches and a stats snapshot
    pub fn from_parts(matches: Vec<PathBuf>, stats: ScanStats) -> Self {
        Self { matches, stats }
    }

    /// Number of matched files
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Set view over the matches for order-independent comparison
    pub fn as_set(&self) -> HashSet<&Path> {
        self.matches.iter().map(PathBuf::as_path).collect()
    }

    /// Merges another result set into this one
    pub fn merge(&mut self, other: SearchResults) {
        self.matches.extend(other.matches);
        self.stats.directories_scanned += other.stats.directories_scanned;
        self.stats.directories_skipped += other.stats.directories_skipped;
        self.stats.files_seen += other.stats.files_seen;
        self.stats.files_matched += other.stats.files_matched;
        self.stats.cache_hits += other.stats.cache_hits;
        self.stats.cache_misses += other.stats.cache_misses;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(scanned: u64, skipped: u64, seen: u64, matched: u64) -> ScanStats {
        ScanStats {
            directories_scanned: scanned,
            directories_skipped: skipped,
            files_seen: seen,
            files_matched: matched,
            cache_hits: 0,
            cache_misses: 0,
        }
    }

    #[test]
    fn test_new_is_empty() {
        let results = SearchResults::new();
        assert!(results.is_empty());
        assert_eq!(results.len(), 0);
        assert_eq!(results.stats.directories_scanned, 0);
    }

    #[test]
    fn test_from_parts() {
        let results = SearchResults::from_parts(
            vec![PathBuf::from("/a/x.md"), PathBuf::from("/b/z.md")],
            stats(3, 1, 5, 2),
        );
        assert_eq!(results.len(), 2);
        assert_eq!(results.stats.files_seen, 5);
    }

    #[test]
    fn test_as_set_ignores_order() {
        let forward = SearchResults::from_parts(
            vec![PathBuf::from("/a"), PathBuf::from("/b")],
            ScanStats::default(),
        );
        let backward = SearchResults::from_parts(
            vec![PathBuf::from("/b"), PathBuf::from("/a")],
            ScanStats::default(),
        );
        assert_eq!(forward.as_set(), backward.as_set());
    }

    #[test]
    fn test_merge() {
        let mut left = SearchResults::from_parts(vec![PathBuf::from("/a/x.md")], stats(2, 0, 3, 1));
        let right = SearchResults::from_parts(vec![PathBuf::from("/b/z.md")], stats(1, 1, 2, 1));

        left.merge(right);

        assert_eq!(left.len(), 2);
        assert_eq!(left.stats.directories_scanned, 3);
        assert_eq!(left.stats.directories_skipped, 1);
        assert_eq!(left.stats.files_seen, 5);
        assert_eq!(left.stats.files_matched, 2);
    }

    #[test]
    fn test_merge_empty() {
        let mut results =
            SearchResults::from_parts(vec![PathBuf::from("/a/x.md")], stats(1, 0, 1, 1));
        results.merge(SearchResults::new());
        assert_eq!(results.len(), 1);
        assert_eq!(results.stats.files_matched, 1);
    }
}
