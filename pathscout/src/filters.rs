use glob::Pattern;
use std::path::Path;

/// Checks if a path should be excluded from the scan based on ignore patterns.
///
/// Patterns use glob syntax and are matched against the full path with
/// forward slashes. Applies to directories (the subtree is never entered)
/// as well as files (the entry is never evaluated against the search
/// patterns). An invalid pattern matches nothing.
pub fn should_ignore(path: &Path, ignore_patterns: &[String]) -> bool {
    if ignore_patterns.is_empty() {
        return false;
    }

    let normalized_path = path.to_string_lossy().replace('\\', "/");
    ignore_patterns.iter().any(|pattern| {
        if let Ok(p) = Pattern::new(pattern) {
            p.matches(&normalized_path)
        } else {
            false
        }
    })
}
