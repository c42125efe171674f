use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Default upper bound on concurrently scanning workers.
pub const DEFAULT_MAX_WORKERS: usize = 10;

/// Default number of top-level directories handed to one worker at a time.
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Configuration for one search operation.
///
/// # Configuration Locations
///
/// The configuration can be loaded from multiple locations in order of precedence:
/// 1. Custom config file specified via `--config` flag
/// 2. Local `.pathscout.yaml` in the current directory
/// 3. Global `$HOME/.config/pathscout/config.yaml`
///
/// # Configuration Format
///
/// The configuration uses YAML format. Example:
/// ```yaml
/// # Root directory to start the search from
/// root_path: "/data/archive"
///
/// # Pattern matched anywhere in a file name
/// filename_pattern: "report"
///
/// # Pattern matched against the start of a file name
/// format_pattern: ".*\\.md$"
///
/// # Paths excluded from the scan (glob syntax)
/// ignore_patterns:
///   - "**/node_modules/**"
///
/// # Concurrency knobs
/// max_workers: 10
/// batch_size: 5
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "warn"
/// ```
///
/// When using the CLI, command-line arguments take precedence over config
/// file values. The merging behavior is defined in the `merge_with_cli`
/// method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Root directory to start the search from
    #[serde(default = "default_root_path")]
    pub root_path: PathBuf,

    /// Pattern matched anywhere in a file name. The empty pattern matches
    /// every name.
    #[serde(default)]
    pub filename_pattern: String,

    /// Pattern matched against the start of a file name. Extension filters
    /// such as `.*\.md$` carry their own trailing anchor; the empty pattern
    /// matches every name.
    #[serde(default)]
    pub format_pattern: String,

    /// Paths excluded from the scan (supports glob syntax)
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Upper bound on concurrently scanning workers
    #[serde(default = "default_max_workers")]
    pub max_workers: NonZeroUsize,

    /// Number of top-level directories handed to one worker at a time
    #[serde(default = "default_batch_size")]
    pub batch_size: NonZeroUsize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_root_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_max_workers() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_MAX_WORKERS).unwrap()
}

fn default_batch_size() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_BATCH_SIZE).unwrap()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            filename_pattern: String::new(),
            format_pattern: String::new(),
            ignore_patterns: Vec::new(),
            max_workers: default_max_workers(),
            batch_size: default_batch_size(),
            log_level: default_log_level(),
        }
    }
}

impl SearchConfig {
    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration from a specific file, falling back to the
    /// default locations
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        // Default config locations
        let config_files = [
            // Global config
            dirs::config_dir().map(|p| p.join("pathscout/config.yaml")),
            // Local config
            Some(PathBuf::from(".pathscout.yaml")),
            // Custom config
            config_path.map(PathBuf::from),
        ];

        // Add existing config files
        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        // Build and deserialize
        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli_config: SearchConfig) -> Self {
        // CLI values take precedence over config file values
        if cli_config.root_path != default_root_path() {
            self.root_path = cli_config.root_path;
        }
        if !cli_config.filename_pattern.is_empty() {
            self.filename_pattern = cli_config.filename_pattern;
        }
        if !cli_config.format_pattern.is_empty() {
            self.format_pattern = cli_config.format_pattern;
        }
        if !cli_config.ignore_patterns.is_empty() {
            self.ignore_patterns = cli_config.ignore_patterns;
        }
        if cli_config.max_workers != default_max_workers() {
            self.max_workers = cli_config.max_workers;
        }
        if cli_config.batch_size != default_batch_size() {
            self.batch_size = cli_config.batch_size;
        }
        if cli_config.log_level != default_log_level() {
            self.log_level = cli_config.log_level;
        }
        self
    }
}
