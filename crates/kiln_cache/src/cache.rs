//! High-level cache interface for a compile driver.
//!
//! [`BuildCache`] ties the fingerprint calculator and the artifact store to a
//! single cache root and exposes the three steps a driver needs: compute the
//! key, try to emit from the cache, and cache fresh outputs after compiling.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CacheError;
use crate::fingerprint::FingerprintCalculator;
use crate::inputs::{CompilerArguments, OutputPaths};
use crate::key::HashKey;
use crate::module::ExtensionModule;
use crate::store::ArtifactStore;

/// Severity of a compiler diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message.
    Info,
    /// Warning that does not fail the build.
    Warning,
    /// Error that fails the build.
    Error,
}

/// A diagnostic reported by the compiler.
///
/// Accepted when committing, but not persisted: a cache hit never replays
/// the diagnostics of the compilation that produced the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity.
    pub severity: Severity,
    /// Compiler-specific code, e.g. `CS0168`.
    pub code: String,
    /// Rendered message.
    pub message: String,
}

/// The operations a compile driver performs against a compilation cache.
///
/// Object safe, so drivers can hold a `Box<dyn CompilationCache>`.
pub trait CompilationCache {
    /// Computes the key of one compiler invocation.
    fn calculate_hash(
        &self,
        command_line: &[String],
        arguments: &CompilerArguments,
        modules: &[&dyn ExtensionModule],
    ) -> Result<HashKey, CacheError>;

    /// Restores cached outputs for `key`.
    ///
    /// Returns the diagnostics to report on a hit (always empty, since they
    /// are not persisted) and `None` on a miss, meaning the driver must
    /// compile.
    fn try_emit(
        &self,
        key: HashKey,
        outputs: &OutputPaths,
    ) -> Result<Option<Vec<Diagnostic>>, CacheError>;

    /// Stores freshly compiled outputs under `key`.
    fn cache(
        &self,
        key: HashKey,
        outputs: &OutputPaths,
        diagnostics: &[Diagnostic],
    ) -> Result<(), CacheError>;
}

/// Compilation cache over one cache root directory.
pub struct BuildCache {
    calculator: FingerprintCalculator,
    store: ArtifactStore,
}

impl BuildCache {
    /// Creates a cache rooted at `cache_dir`.
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            calculator: FingerprintCalculator::new(cache_dir),
            store: ArtifactStore::new(cache_dir),
        }
    }

    /// Enables or disables writing fingerprint traces.
    pub fn with_trace(mut self, write_trace: bool) -> Self {
        self.calculator = self.calculator.with_trace(write_trace);
        self
    }

    /// Returns the underlying artifact store.
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }
}

impl CompilationCache for BuildCache {
    fn calculate_hash(
        &self,
        command_line: &[String],
        arguments: &CompilerArguments,
        modules: &[&dyn ExtensionModule],
    ) -> Result<HashKey, CacheError> {
        self.calculator
            .compute_hash(command_line, arguments, modules)
    }

    fn try_emit(
        &self,
        key: HashKey,
        outputs: &OutputPaths,
    ) -> Result<Option<Vec<Diagnostic>>, CacheError> {
        Ok(self.store.restore(key, outputs)?.then(Vec::new))
    }

    fn cache(
        &self,
        key: HashKey,
        outputs: &OutputPaths,
        diagnostics: &[Diagnostic],
    ) -> Result<(), CacheError> {
        self.store.commit(key, outputs, diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::InputValue;
    use crate::module::LoadedModule;
    use crate::store::MARKER_FILE;

    #[test]
    fn miss_then_cache_then_hit() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("Program.cs");
        let out = dir.path().join("app.dll");
        std::fs::write(&src, "class Program { }").unwrap();

        let cache = BuildCache::new(&dir.path().join(".kiln-cache"));
        let args = CompilerArguments {
            source_files: InputValue::paths([&src]),
            outputs: OutputPaths {
                output: Some(out.clone()),
                ..Default::default()
            },
            ..Default::default()
        };
        let key = cache.calculate_hash(&[], &args, &[]).unwrap();
        assert!(cache.try_emit(key, &args.outputs).unwrap().is_none());

        // "Compile"
        std::fs::write(&out, b"compiled").unwrap();
        let diagnostics = vec![Diagnostic {
            severity: Severity::Warning,
            code: "CS0168".to_string(),
            message: "variable declared but never used".to_string(),
        }];
        cache.cache(key, &args.outputs, &diagnostics).unwrap();

        std::fs::remove_file(&out).unwrap();
        let emitted = cache.try_emit(key, &args.outputs).unwrap();
        assert_eq!(emitted, Some(Vec::new()));
        assert_eq!(std::fs::read(&out).unwrap(), b"compiled");
    }

    #[test]
    fn diagnostic_serde_roundtrip() {
        let d = Diagnostic {
            severity: Severity::Error,
            code: "CS1002".to_string(),
            message: "; expected".to_string(),
        };
        let json = serde_json::to_string(&d).unwrap();
        assert!(json.contains("\"error\""));
        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn usable_as_trait_object() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("Program.cs");
        let plugin_bin = dir.path().join("Aspects.dll");
        let out = dir.path().join("app.dll");
        std::fs::write(&src, "class Program { }").unwrap();
        std::fs::write(&plugin_bin, b"MZ plugin").unwrap();

        let cache: Box<dyn CompilationCache> =
            Box::new(BuildCache::new(&dir.path().join(".kiln-cache")));
        let plugin = LoadedModule::new("Aspects.Logging", &plugin_bin);
        let args = CompilerArguments {
            source_files: InputValue::paths([&src]),
            outputs: OutputPaths {
                output: Some(out.clone()),
                ..Default::default()
            },
            ..Default::default()
        };

        let key = cache.calculate_hash(&[], &args, &[&plugin]).unwrap();
        assert_ne!(key, cache.calculate_hash(&[], &args, &[]).unwrap());

        std::fs::write(&out, b"compiled").unwrap();
        cache.cache(key, &args.outputs, &[]).unwrap();
        assert!(dir
            .path()
            .join(".kiln-cache")
            .join(key.to_string())
            .join(MARKER_FILE)
            .is_file());
        assert_eq!(cache.try_emit(key, &args.outputs).unwrap(), Some(Vec::new()));
    }
}
