//! Fingerprinting of compiler invocations.
//!
//! The fingerprint covers the extension modules taking part in the
//! compilation and the content of every file reachable from every
//! [`InputCategory`]. Compiler options are not hashed from the raw command
//! line; an option that is not represented by a category does not affect
//! the key.

use std::path::{Path, PathBuf};

use kiln_common::ContentHash;

use crate::error::CacheError;
use crate::hasher::GenericHasher;
use crate::inputs::{CompilerArguments, InputCategory, InputValue};
use crate::key::HashKey;
use crate::module::{ExtensionModule, ModuleIdentity};
use crate::store::partition_dir;
use crate::trace::{FingerprintTrace, TRACE_FILE};

/// Derives cache keys for compiler invocations.
///
/// Stateless apart from the cache root, which only receives the trace file.
pub struct FingerprintCalculator {
    /// Root cache directory.
    cache_dir: PathBuf,

    /// Whether to write the trace into the key's partition.
    write_trace: bool,
}

impl FingerprintCalculator {
    /// Creates a calculator that writes traces under `cache_dir`.
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            cache_dir: cache_dir.to_path_buf(),
            write_trace: true,
        }
    }

    /// Enables or disables writing the trace file.
    pub fn with_trace(mut self, write_trace: bool) -> Self {
        self.write_trace = write_trace;
        self
    }

    /// Computes the key of one compiler invocation.
    ///
    /// `command_line` only appears in the trace. Any unreadable file or
    /// unrecognized input value aborts the computation; no key, partition or
    /// trace is produced in that case.
    pub fn compute_hash<M: ExtensionModule>(
        &self,
        command_line: &[String],
        arguments: &CompilerArguments,
        modules: &[M],
    ) -> Result<HashKey, CacheError> {
        let mut trace = FingerprintTrace::new();
        trace.command_line(command_line);

        let identity = ModuleIdentity::compute(modules)?;
        trace.modules(&identity);

        let mut category_digests = Vec::with_capacity(InputCategory::ALL.len());
        for (category, value) in arguments.inputs() {
            let digest = hash_value(category, value, arguments, &mut trace)?;
            trace.category(category, digest);
            category_digests.push(digest);
        }

        let files = GenericHasher::combine(&category_digests);
        trace.files_total(files);

        let key = HashKey::new(GenericHasher::combine(&[files, identity.digest]));
        trace.total(key);
        log::info!(
            "fingerprint {key} ({} module types, files {files})",
            identity.types.len()
        );

        if self.write_trace {
            self.save_trace(key, &trace);
        }
        Ok(key)
    }

    /// Writes the trace into the key's partition.
    ///
    /// Failures are logged and otherwise ignored: the trace is diagnostic
    /// output and the key is already final.
    fn save_trace(&self, key: HashKey, trace: &FingerprintTrace) {
        let dir = partition_dir(&self.cache_dir, key);
        let path = dir.join(TRACE_FILE);
        let result = std::fs::create_dir_all(&dir)
            .and_then(|()| std::fs::write(&path, trace.as_str()));
        if let Err(e) = result {
            log::warn!("failed to write fingerprint trace {}: {e}", path.display());
        }
    }
}

/// Resolves one category value to a digest.
fn hash_value(
    category: InputCategory,
    value: &InputValue,
    arguments: &CompilerArguments,
    trace: &mut FingerprintTrace,
) -> Result<ContentHash, CacheError> {
    match value {
        InputValue::Absent => Ok(ContentHash::PLACEHOLDER),
        InputValue::Path(path) => hash_path(category, path, arguments, trace),
        InputValue::List(items) => {
            let digests = items
                .iter()
                .map(|item| hash_value(category, item, arguments, trace))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(GenericHasher::combine(&digests))
        }
        InputValue::SourceFile { source, .. } => hash_path(category, source, arguments, trace),
        InputValue::AnalyzerReference { analyzer } => {
            hash_path(category, analyzer, arguments, trace)
        }
        InputValue::Resource { file: Some(file), .. } => {
            hash_path(category, file, arguments, trace)
        }
        // In-memory resources carry no file.
        InputValue::Resource { file: None, .. } => Ok(ContentHash::PLACEHOLDER),
        InputValue::MetadataReference { reference, .. } => {
            hash_path(category, reference, arguments, trace)
        }
        InputValue::Unrecognized(_) => Err(CacheError::UnsupportedInput {
            input: category.name().to_string(),
            shape: value.shape(),
        }),
    }
}

fn hash_path(
    category: InputCategory,
    path: &Path,
    arguments: &CompilerArguments,
    trace: &mut FingerprintTrace,
) -> Result<ContentHash, CacheError> {
    let resolved = arguments.resolve_path(path);
    let digest = GenericHasher::hash_file(&resolved).map_err(|e| CacheError::MissingInput {
        input: category.name().to_string(),
        path: resolved.clone(),
        source: e,
    })?;
    log::debug!("{category}: {} -> {digest}", resolved.display());
    trace.file(&resolved, digest);
    Ok(digest)
}
