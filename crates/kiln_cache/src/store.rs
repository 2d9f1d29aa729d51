//! Key-addressed storage of compilation outputs.
//!
//! Each key owns one immediate subdirectory of the cache root holding the
//! cached artifacts under their base file names. A partition only counts as
//! a cache entry once its commit marker exists; the marker is written after
//! every artifact has been copied in, so a process killed mid-commit leaves
//! an incomplete partition that is never restored.

use std::path::{Path, PathBuf};

use crate::cache::Diagnostic;
use crate::error::CacheError;
use crate::inputs::OutputPaths;
use crate::key::HashKey;
use crate::trace::TRACE_FILE;

/// Name of the commit marker file inside a partition.
pub const MARKER_FILE: &str = "cached-at.txt";

/// Base names no cached artifact may take.
const RESERVED_NAMES: [&str; 2] = [MARKER_FILE, TRACE_FILE];

/// Returns the partition directory for `key` under `cache_dir`.
pub(crate) fn partition_dir(cache_dir: &Path, key: HashKey) -> PathBuf {
    cache_dir.join(key.to_string())
}

/// Store mapping keys to partitions of cached artifacts.
///
/// Holds no state besides the root; every call goes to disk, so any number
/// of processes can share one root.
pub struct ArtifactStore {
    /// Root cache directory.
    cache_dir: PathBuf,
}

impl ArtifactStore {
    /// Creates a new artifact store rooted at the given cache directory.
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            cache_dir: cache_dir.to_path_buf(),
        }
    }

    /// Returns the cache root.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the partition directory for `key`.
    pub fn partition_path(&self, key: HashKey) -> PathBuf {
        partition_dir(&self.cache_dir, key)
    }

    /// Returns `true` if the partition for `key` has been committed.
    pub fn is_committed(&self, key: HashKey) -> bool {
        let dir = self.partition_path(key);
        dir.is_dir() && dir.join(MARKER_FILE).is_file()
    }

    /// Copies the cached artifacts for `key` onto the requested paths.
    ///
    /// Returns `Ok(false)` when there is no committed entry for `key`. On a
    /// hit, every set output path is overwritten with the cached file of the
    /// same base name. Diagnostics are not restored.
    pub fn restore(&self, key: HashKey, outputs: &OutputPaths) -> Result<bool, CacheError> {
        if !self.is_committed(key) {
            log::info!("cache miss for {key}");
            return Ok(false);
        }

        let dir = self.partition_path(key);
        for (name, dest) in outputs.named() {
            let source = dir.join(base_name(dest)?);
            copy_file(&source, dest)?;
            log::debug!("restored {name} {} from {key}", dest.display());
        }
        log::info!("cache hit for {key}");
        Ok(true)
    }

    /// Stores the produced artifacts under `key` and marks the entry committed.
    ///
    /// Unset and non-existent output paths are skipped. The commit marker is
    /// written last. Outputs named like the marker or the trace are rejected
    /// before anything is written.
    pub fn commit(
        &self,
        key: HashKey,
        outputs: &OutputPaths,
        diagnostics: &[Diagnostic],
    ) -> Result<(), CacheError> {
        for (_, source) in outputs.named() {
            let name = base_name(source)?;
            if let Some(reserved) = RESERVED_NAMES.into_iter().find(|r| name == *r) {
                return Err(CacheError::ReservedName {
                    path: source.to_path_buf(),
                    name: reserved,
                });
            }
        }

        let dir = self.partition_path(key);
        std::fs::create_dir_all(&dir).map_err(|e| CacheError::Io {
            path: dir.clone(),
            source: e,
        })?;

        for (name, source) in outputs.named() {
            if !source.is_file() {
                log::debug!("skipping missing {name} {}", source.display());
                continue;
            }
            let dest = dir.join(base_name(source)?);
            copy_file(source, &dest)?;
            log::debug!("cached {name} {} in {key}", source.display());
        }

        if !diagnostics.is_empty() {
            log::debug!(
                "{} diagnostics for {key} are not persisted",
                diagnostics.len()
            );
        }

        let marker = dir.join(MARKER_FILE);
        let stamp = chrono::Local::now().format("%c").to_string();
        std::fs::write(&marker, stamp).map_err(|e| CacheError::Io {
            path: marker,
            source: e,
        })?;
        log::info!("committed {key}");
        Ok(())
    }
}

fn base_name(path: &Path) -> Result<&std::ffi::OsStr, CacheError> {
    path.file_name().ok_or_else(|| CacheError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "output path has no file name",
        ),
    })
}

fn copy_file(from: &Path, to: &Path) -> Result<(), CacheError> {
    std::fs::copy(from, to).map(|_| ()).map_err(|e| CacheError::Io {
        path: from.to_path_buf(),
        source: e,
    })
}
