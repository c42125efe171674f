use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use crate::errors::{SearchError, SearchResult};
use crate::metrics::ScanMetrics;

const LITERAL_PATTERN_THRESHOLD: usize = 32;

static PATTERN_CACHE: Lazy<DashMap<(String, MatchMode), MatchStrategy>> = Lazy::new(DashMap::new);

/// How a compiled pattern is applied to an entry name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchMode {
    /// The pattern may match anywhere in the name
    Anywhere,
    /// The pattern must match starting at the first byte of the name
    Prefix,
}

/// Strategy for matching one pattern against entry names
#[derive(Debug, Clone)]
pub enum MatchStrategy {
    Literal(String),
    Regex(Arc<Regex>),
}

/// Decides whether a single file name satisfies both search patterns.
///
/// The filename pattern is a substring search: it matches if it occurs
/// anywhere in the name. The format pattern is anchored at the start of
/// the name, which is how extension filters such as `.*\.md$` are applied
/// against the whole filename. A name is reported only when both hold.
///
/// Holds no mutable state after construction, so one matcher is shared
/// read-only across all workers.
#[derive(Debug, Clone)]
pub struct EntryMatcher {
    filename: MatchStrategy,
    format: MatchStrategy,
    metrics: Arc<ScanMetrics>,
}

impl EntryMatcher {
    /// Compiles both patterns, failing before any directory is touched
    pub fn new(filename_pattern: &str, format_pattern: &str) -> SearchResult<Self> {
        Self::with_metrics(
            filename_pattern,
            format_pattern,
            Arc::new(ScanMetrics::new()),
        )
    }

    /// Compiles both patterns, recording cache traffic on the given metrics
    pub fn with_metrics(
        filename_pattern: &str,
        format_pattern: &str,
        metrics: Arc<ScanMetrics>,
    ) -> SearchResult<Self> {
        let filename = compile_pattern(filename_pattern, MatchMode::Anywhere, &metrics)?;
        let format = compile_pattern(format_pattern, MatchMode::Prefix, &metrics)?;
        Ok(Self {
            filename,
            format,
            metrics,
        })
    }

    /// Gets the metrics this matcher records into
    pub fn metrics(&self) -> &ScanMetrics {
        &self.metrics
    }

    /// Returns true when the name satisfies the format pattern at position
    /// zero and contains a filename-pattern hit anywhere
    pub fn matches(&self, name: &str) -> bool {
        self.matches_format(name) && self.matches_filename(name)
    }

    fn matches_filename(&self, name: &str) -> bool {
        match &self.filename {
            MatchStrategy::Literal(literal) => name.contains(literal.as_str()),
            MatchStrategy::Regex(regex) => regex.is_match(name),
        }
    }

    fn matches_format(&self, name: &str) -> bool {
        match &self.format {
            MatchStrategy::Literal(literal) => name.starts_with(literal.as_str()),
            // The compiled regex carries its own \A anchor
            MatchStrategy::Regex(regex) => regex.is_match(name),
        }
    }
}

/// Compiles a pattern for the given mode, consulting the global cache
fn compile_pattern(
    pattern: &str,
    mode: MatchMode,
    metrics: &ScanMetrics,
) -> SearchResult<MatchStrategy> {
    let key = (pattern.to_string(), mode);
    if let Some(entry) = PATTERN_CACHE.get(&key) {
        metrics.record_cache_lookup(true);
        return Ok(entry.clone());
    }

    let strategy = if is_literal_pattern(pattern) {
        MatchStrategy::Literal(pattern.to_string())
    } else {
        let source = match mode {
            MatchMode::Anywhere => pattern.to_string(),
            MatchMode::Prefix => format!(r"\A(?:{pattern})"),
        };
        let regex = Regex::new(&source)
            .map_err(|e| SearchError::invalid_pattern(e.to_string()))?;
        MatchStrategy::Regex(Arc::new(regex))
    };

    metrics.record_cache_lookup(false);
    PATTERN_CACHE.insert(key, strategy.clone());
    Ok(strategy)
}

/// Determines if a pattern can skip regex compilation entirely
fn is_literal_pattern(pattern: &str) -> bool {
    pattern.len() < LITERAL_PATTERN_THRESHOLD
        && !pattern.contains(|c: char| c.is_ascii_punctuation() && c != '_' && c != '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_pattern_matches_anywhere() {
        let matcher = EntryMatcher::new("report", "").unwrap();
        assert!(matcher.matches("report.txt"));
        assert!(matcher.matches("annual_report_final.txt"));
        assert!(!matcher.matches("summary.txt"));
    }

    #[test]
    fn test_format_pattern_is_anchored() {
        // A format hit starting past position zero does not count.
        let matcher = EntryMatcher::new("", "data").unwrap();
        assert!(matcher.matches("data_2024.csv"));
        assert!(!matcher.matches("raw_data_2024.csv"));
    }

    #[test]
    fn test_format_regex_is_anchored() {
        let matcher = EntryMatcher::new("", r"[a-z]+\.md$").unwrap();
        assert!(matcher.matches("notes.md"));
        assert!(!matcher.matches("1notes.md"));
    }

    #[test]
    fn test_extension_filter() {
        let matcher = EntryMatcher::new("", r".*\.md$").unwrap();
        assert!(matcher.matches("x.md"));
        assert!(matcher.matches("deeply.nested.name.md"));
        assert!(!matcher.matches("y.txt"));
        assert!(!matcher.matches("z.md.bak"));
    }

    #[test]
    fn test_both_patterns_must_hold() {
        let matcher = EntryMatcher::new("report", r".*\.md$").unwrap();
        assert!(matcher.matches("q3_report.md"));
        assert!(!matcher.matches("q3_report.txt"));
        assert!(!matcher.matches("summary.md"));
    }

    #[test]
    fn test_empty_patterns_match_everything() {
        let matcher = EntryMatcher::new("", "").unwrap();
        assert!(matcher.matches("anything.bin"));
        assert!(matcher.matches(""));
    }

    #[test]
    fn test_regex_filename_pattern() {
        let matcher = EntryMatcher::new(r"report_\d{4}", "").unwrap();
        assert!(matcher.matches("old_report_2024.txt"));
        assert!(!matcher.matches("report_24.txt"));
    }

    #[test]
    fn test_invalid_filename_pattern() {
        let err = EntryMatcher::new("(unclosed", "").unwrap_err();
        assert!(matches!(err, SearchError::InvalidPattern(_)));
    }

    #[test]
    fn test_invalid_format_pattern() {
        let err = EntryMatcher::new("", "[z-a]").unwrap_err();
        assert!(matches!(err, SearchError::InvalidPattern(_)));
    }

    #[test]
    fn test_is_literal_pattern() {
        assert!(is_literal_pattern("report"));
        assert!(is_literal_pattern("annual-report_v2"));
        assert!(is_literal_pattern(""));
        assert!(!is_literal_pattern(r".*\.md$"));
        assert!(!is_literal_pattern(r"report_\d{4}"));
    }

    #[test]
    fn test_pattern_caching() {
        // Use a unique pattern for this test to avoid interference from other tests
        let unique_pattern = format!(
            "cache_probe_{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        );

        let metrics = Arc::new(ScanMetrics::new());

        // First compile misses for both modes
        let _first =
            EntryMatcher::with_metrics(&unique_pattern, &unique_pattern, metrics.clone()).unwrap();
        assert_eq!(metrics.cache_hits(), 0);
        assert_eq!(metrics.cache_misses(), 2);

        // Second compile hits for both modes
        let _second =
            EntryMatcher::with_metrics(&unique_pattern, &unique_pattern, metrics.clone()).unwrap();
        assert_eq!(metrics.cache_hits(), 2);
        assert_eq!(metrics.cache_misses(), 2);
    }
}
