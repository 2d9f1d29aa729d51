//! Human-readable record of everything that went into a fingerprint.
//!
//! The trace is written next to the cached artifacts so that an unexpected
//! cache miss can be diagnosed by diffing the traces of two invocations.

use std::fmt::Write as _;
use std::path::Path;

use kiln_common::ContentHash;

use crate::inputs::InputCategory;
use crate::key::HashKey;
use crate::module::ModuleIdentity;

/// Name of the trace file inside a cache partition.
pub const TRACE_FILE: &str = "cache-sources.txt";

/// Accumulates trace lines while a fingerprint is computed.
#[derive(Debug, Default)]
pub struct FingerprintTrace {
    text: String,
}

// `fmt::Write` for `String` never fails, so the results below are discarded.
impl FingerprintTrace {
    /// Creates an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the raw command line.
    pub fn command_line(&mut self, tokens: &[String]) {
        let _ = writeln!(self.text, "CommandLine:");
        let _ = writeln!(self.text, " {}", tokens.join(" "));
    }

    /// Records the module types, their binaries, and the combined identity.
    pub fn modules(&mut self, identity: &ModuleIdentity) {
        let _ = writeln!(self.text, "CompilationModules:");
        let _ = writeln!(self.text, " Types:");
        for (name, binary) in &identity.types {
            let _ = writeln!(self.text, "  {name} ({})", binary.display());
        }
        let _ = writeln!(self.text, " Binaries:");
        for (binary, digest) in &identity.binaries {
            let _ = writeln!(self.text, "  {}->{digest}", binary.display());
        }
        let _ = writeln!(self.text, " Full: {}", identity.digest);
        let _ = writeln!(self.text, "Files:");
    }

    /// Records one hashed file.
    pub fn file(&mut self, path: &Path, digest: ContentHash) {
        let _ = writeln!(self.text, "  {} -> {digest}", path.display());
    }

    /// Records the digest of a whole category.
    pub fn category(&mut self, category: InputCategory, digest: ContentHash) {
        let _ = writeln!(self.text, " {category} -> {digest}\n");
    }

    /// Records the combined digest of all categories.
    pub fn files_total(&mut self, digest: ContentHash) {
        let _ = writeln!(self.text, " Total: {digest}");
    }

    /// Records the final key.
    pub fn total(&mut self, key: HashKey) {
        let _ = writeln!(self.text, "Total: {key}");
    }

    /// Returns the trace text.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}
