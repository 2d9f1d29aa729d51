//! Error types for fingerprinting and cache storage.

use std::path::PathBuf;

/// Errors that can occur while fingerprinting an invocation or touching the
/// cache root.
///
/// Input errors are fatal to the whole compilation attempt: a key computed
/// without one of its inputs would be unsound, so there is no fallback to
/// "skip caching". A cache miss is not an error at all.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// A file referenced by an input category (or an extension module's
    /// binary) could not be read.
    #[error("cannot read {input} input {path}: {source}")]
    MissingInput {
        /// The input category or module label the file belongs to.
        input: String,
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An input category holds a value of a shape the fingerprinter does not
    /// know how to resolve to files.
    #[error("unsupported {input} input: {shape}")]
    UnsupportedInput {
        /// The input category holding the value.
        input: String,
        /// Description of the unrecognized value.
        shape: String,
    },

    /// An I/O error occurred while reading or writing cache files.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An output artifact shares its base file name with a file the cache
    /// keeps in every partition.
    #[error("output {path} collides with the reserved cache file '{name}'")]
    ReservedName {
        /// The offending output path.
        path: PathBuf,
        /// The reserved base name.
        name: &'static str,
    },

    /// A string could not be parsed as a cache key.
    #[error("invalid cache key '{0}'")]
    InvalidKey(String),
}

impl CacheError {
    /// Returns `true` for errors caused by the invocation's inputs rather
    /// than by the cache storage.
    pub fn is_fatal_input(&self) -> bool {
        matches!(
            self,
            CacheError::MissingInput { .. } | CacheError::UnsupportedInput { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_display() {
        let err = CacheError::MissingInput {
            input: "SourceFiles".to_string(),
            path: PathBuf::from("src/Program.cs"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("SourceFiles"));
        assert!(msg.contains("Program.cs"));
        assert!(err.is_fatal_input());
    }

    #[test]
    fn unsupported_input_display() {
        let err = CacheError::UnsupportedInput {
            input: "MetadataReferences".to_string(),
            shape: "number 42".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unsupported MetadataReferences input: number 42"
        );
        assert!(err.is_fatal_input());
    }

    #[test]
    fn io_error_display() {
        let err = CacheError::Io {
            path: PathBuf::from("/tmp/cache/abc/cached-at.txt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("cache I/O error"));
        assert!(msg.contains("cached-at.txt"));
        assert!(!err.is_fatal_input());
    }

    #[test]
    fn reserved_name_display() {
        let err = CacheError::ReservedName {
            path: PathBuf::from("bin/cached-at.txt"),
            name: "cached-at.txt",
        };
        assert_eq!(
            err.to_string(),
            "output bin/cached-at.txt collides with the reserved cache file 'cached-at.txt'"
        );
        assert!(!err.is_fatal_input());
    }

    #[test]
    fn invalid_key_display() {
        let err = CacheError::InvalidKey("xyz".to_string());
        assert_eq!(err.to_string(), "invalid cache key 'xyz'");
        assert!(!err.is_fatal_input());
    }
}
