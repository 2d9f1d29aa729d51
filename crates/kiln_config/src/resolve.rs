//! Resolution of the effective cache settings.

use crate::types::{KilnConfig, LogLevel};
use std::path::{Path, PathBuf};

/// Cache settings after applying the file location and overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// Absolute or caller-relative cache root.
    pub cache_root: PathBuf,
    /// Whether to write fingerprint traces.
    pub trace: bool,
    /// Default log level.
    pub log_level: LogLevel,
}

/// Resolves the effective settings.
///
/// A `cache_dir_override` (from the command line) wins over `cache.root`.
/// A relative `cache.root` is taken relative to `config_dir`, the directory
/// holding the configuration file.
pub fn resolve_settings(
    config: &KilnConfig,
    config_dir: &Path,
    cache_dir_override: Option<&Path>,
) -> CacheSettings {
    let cache_root = match cache_dir_override {
        Some(dir) => dir.to_path_buf(),
        None => {
            let root = Path::new(&config.cache.root);
            if root.is_relative() {
                config_dir.join(root)
            } else {
                root.to_path_buf()
            }
        }
    };

    CacheSettings {
        cache_root,
        trace: config.cache.trace,
        log_level: config.log.level,
    }
}
