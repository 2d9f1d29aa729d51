//! Configuration types deserialized from `kiln.toml`.

use serde::Deserialize;

/// Default cache root, relative to the directory holding `kiln.toml`.
pub const DEFAULT_CACHE_ROOT: &str = ".kiln-cache";

/// The top-level configuration parsed from `kiln.toml`.
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Default, Deserialize)]
pub struct KilnConfig {
    /// Cache storage settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// Where the cache lives and what it writes.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Cache root directory. Relative paths resolve against the directory
    /// containing the configuration file.
    #[serde(default = "default_root")]
    pub root: String,
    /// Whether to write a fingerprint trace into each partition.
    #[serde(default = "default_trace")]
    pub trace: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            trace: default_trace(),
        }
    }
}

fn default_root() -> String {
    DEFAULT_CACHE_ROOT.to_string()
}

fn default_trace() -> bool {
    true
}

/// Logging configuration, applied when neither `RUST_LOG` nor a verbosity
/// flag is given.
#[derive(Debug, Default, Deserialize)]
pub struct LogConfig {
    /// Default log level.
    #[serde(default)]
    pub level: LogLevel,
}

/// Log level names accepted in `kiln.toml`.
#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Warnings and errors (default).
    #[default]
    Warn,
    /// Cache hits, misses and commits.
    Info,
    /// Per-file digests.
    Debug,
    /// Everything.
    Trace,
}
