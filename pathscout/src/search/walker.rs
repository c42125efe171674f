use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

use super::engine::CancelToken;
use super::matcher::EntryMatcher;
use crate::filters::should_ignore;
use crate::metrics::ScanMetrics;

/// Scans the directory batches assigned to one worker.
///
/// Each batch is walked depth-first on the worker that owns it;
/// subdirectories are never handed back to the pool. Directories that
/// cannot be read (permission denied, vanished between listing and
/// access) yield no entries and the walk continues with their siblings.
pub struct BatchWalker {
    matcher: EntryMatcher,
    ignore_patterns: Vec<String>,
    metrics: Arc<ScanMetrics>,
    cancel: CancelToken,
}

impl BatchWalker {
    pub fn new(
        matcher: EntryMatcher,
        ignore_patterns: Vec<String>,
        metrics: Arc<ScanMetrics>,
        cancel: CancelToken,
    ) -> Self {
        Self {
            matcher,
            ignore_patterns,
            metrics,
            cancel,
        }
    }

    /// Walks every directory in the batch and returns this task's matches
    pub fn scan_batch(&self, directories: &[PathBuf]) -> Vec<PathBuf> {
        let mut found = Vec::new();
        for directory in directories {
            self.scan_directory(directory, &mut found);
        }
        found
    }

    fn scan_directory(&self, directory: &Path, found: &mut Vec<PathBuf>) {
        if self.cancel.is_cancelled() {
            trace!("Cancelled before entering {}", directory.display());
            return;
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(err) => {
                debug!("Skipping {}: {}", directory.display(), err);
                self.metrics.record_dir_skipped();
                return;
            }
        };
        self.metrics.record_dir_scanned();

        for entry in entries.flatten() {
            // The entry may vanish between listing and stat; skip it like
            // an unreadable directory.
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            let path = entry.path();
            if should_ignore(&path, &self.ignore_patterns) {
                trace!("Ignoring {}", path.display());
                continue;
            }

            if file_type.is_file() {
                self.metrics.record_file_seen();
                let name = entry.file_name();
                if self.matcher.matches(&name.to_string_lossy()) {
                    self.metrics.record_file_matched();
                    found.push(path);
                }
            } else if file_type.is_dir() {
                self.scan_directory(&path, found);
            }
            // Symlinks and special files are not followed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn walker(filename: &str, format: &str) -> BatchWalker {
        BatchWalker::new(
            EntryMatcher::new(filename, format).unwrap(),
            vec![],
            Arc::new(ScanMetrics::new()),
            CancelToken::new(),
        )
    }

    fn touch(path: &Path) {
        let mut file = File::create(path).unwrap();
        writeln!(file, "x").unwrap();
    }

    #[test]
    fn test_scan_batch_recurses() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("sub");
        let nested = sub.join("nested");
        std::fs::create_dir_all(&nested).unwrap();
        touch(&sub.join("a.md"));
        touch(&nested.join("b.md"));
        touch(&nested.join("c.txt"));

        let walker = walker("", r".*\.md$");
        let mut found = walker.scan_batch(&[sub.clone()]);
        found.sort();

        assert_eq!(found, vec![sub.join("a.md"), nested.join("b.md")]);
    }

    #[test]
    fn test_missing_directory_yields_nothing() {
        let dir = tempdir().unwrap();
        let walker = walker("", "");
        let missing = dir.path().join("gone");

        let found = walker.scan_batch(&[missing]);

        assert!(found.is_empty());
        assert_eq!(walker.metrics.get_stats().directories_skipped, 1);
    }

    #[test]
    fn test_ignore_patterns_prune_subtrees() {
        let dir = tempdir().unwrap();
        let keep = dir.path().join("keep");
        let skip = dir.path().join("skip");
        std::fs::create_dir_all(&keep).unwrap();
        std::fs::create_dir_all(&skip).unwrap();
        touch(&keep.join("a.md"));
        touch(&skip.join("b.md"));

        let walker = BatchWalker::new(
            EntryMatcher::new("", r".*\.md$").unwrap(),
            vec!["**/skip/**".to_string(), "**/skip".to_string()],
            Arc::new(ScanMetrics::new()),
            CancelToken::new(),
        );
        let found = walker.scan_batch(&[keep.clone(), skip]);

        assert_eq!(found, vec![keep.join("a.md")]);
    }

    #[test]
    fn test_cancelled_walker_returns_immediately() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir_all(&sub).unwrap();
        touch(&sub.join("a.md"));

        let cancel = CancelToken::new();
        cancel.cancel();
        let walker = BatchWalker::new(
            EntryMatcher::new("", "").unwrap(),
            vec![],
            Arc::new(ScanMetrics::new()),
            cancel,
        );

        assert!(walker.scan_batch(&[sub]).is_empty());
    }
}
